//! API client configuration
//!
//! An [`ApiConfig`] is resolved from layers applied in a fixed order, later
//! layers winning field by field:
//!
//! 1. built-in defaults
//! 2. environment overrides (see [`ApiConfigOverrides::from_public_env`] and
//!    [`ApiConfigOverrides::from_server_env`])
//! 3. a named [`ApiPreset`]
//! 4. explicit overrides
//!
//! ```
//! use userdesk_sdk::config::{ApiPreset, ConfigResolver};
//!
//! let config = ConfigResolver::new()
//!     .preset(ApiPreset::JsonPlaceholder)
//!     .resolve()
//!     .unwrap();
//! assert_eq!(config.base_url, "https://jsonplaceholder.typicode.com");
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use typed_builder::TypedBuilder;

use crate::error::ConfigError;

/// Default backend
pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";
/// Default per-call timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
/// Default retry attempts (carried, the client does not retry)
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
/// Default delay between retries in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

/// Public (client-visible) base URL variable
pub const ENV_PUBLIC_BASE_URL: &str = "PUBLIC_API_BASE_URL";
/// Server-side base URL variable
pub const ENV_BASE_URL: &str = "API_BASE_URL";
/// Server-side timeout variable (milliseconds)
pub const ENV_TIMEOUT: &str = "API_TIMEOUT";
/// Server-side retry attempts variable
pub const ENV_RETRY_ATTEMPTS: &str = "API_RETRY_ATTEMPTS";
/// Server-side retry delay variable (milliseconds)
pub const ENV_RETRY_DELAY: &str = "API_RETRY_DELAY";

fn default_headers() -> HashMap<String, String> {
    HashMap::from([("Content-Type".to_string(), "application/json".to_string())])
}

/// HTTP client configuration
///
/// Immutable once handed to a client; reconfiguring builds a new client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[builder(
    builder_method(doc = "Create a new builder for ApiConfig"),
    builder_type(doc = "Builder for ApiConfig", vis = "pub"),
    build_method(doc = "Build the ApiConfig")
)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    /// Base URL every relative request path is joined onto
    #[builder(default = DEFAULT_BASE_URL.to_string(), setter(into))]
    #[serde(rename = "baseURL")]
    pub base_url: String,

    /// Per-call timeout in milliseconds
    #[builder(default = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Headers sent with every request
    #[builder(default = default_headers())]
    pub headers: HashMap<String, String>,

    /// Retry attempts. Carried and validated only, no call is retried.
    #[builder(default = DEFAULT_RETRY_ATTEMPTS)]
    pub retry_attempts: u32,

    /// Delay between retries in milliseconds
    #[builder(default = DEFAULT_RETRY_DELAY_MS)]
    pub retry_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ApiConfig {
    /// Per-call timeout as a [`Duration`]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check the configuration, reporting the first problem found
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if `base_url` is not an
    /// absolute URL, or `ConfigError::InvalidTimeout` for a zero timeout.
    pub fn check(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }

    /// Apply an override layer, returning the merged configuration
    #[must_use]
    pub fn merged(mut self, overrides: &ApiConfigOverrides) -> Self {
        if let Some(base_url) = &overrides.base_url {
            self.base_url.clone_from(base_url);
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
        if let Some(headers) = &overrides.headers {
            self.headers.clone_from(headers);
        }
        if let Some(retry_attempts) = overrides.retry_attempts {
            self.retry_attempts = retry_attempts;
        }
        if let Some(retry_delay_ms) = overrides.retry_delay_ms {
            self.retry_delay_ms = retry_delay_ms;
        }
        self
    }
}

/// True iff `config` has an absolute base URL and a positive timeout
///
/// Retry settings are unsigned, so their lower bound holds by construction.
#[must_use]
pub fn validate(config: &ApiConfig) -> bool {
    config.check().is_ok()
}

/// A partial configuration layer; unset fields leave the lower layer alone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfigOverrides {
    /// Base URL override
    #[serde(rename = "baseURL", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Timeout override in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Replacement header map
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    /// Retry attempts override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_attempts: Option<u32>,
    /// Retry delay override in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_delay_ms: Option<u64>,
}

impl ApiConfigOverrides {
    /// Override only the base URL
    pub fn base_url(url: impl Into<String>) -> Self {
        Self {
            base_url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Whether this layer changes nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overrides visible to client-side code (public variables only)
    #[must_use]
    pub fn from_public_env() -> Self {
        Self::from_public_lookup(|key| std::env::var(key).ok())
    }

    /// Client-side overrides read through `lookup`
    pub fn from_public_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            base_url: lookup(ENV_PUBLIC_BASE_URL).filter(|v| !v.is_empty()),
            ..Self::default()
        }
    }

    /// Overrides from the server-side environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvValue` if a numeric variable does
    /// not parse.
    pub fn from_server_env() -> Result<Self, ConfigError> {
        Self::from_server_lookup(|key| std::env::var(key).ok())
    }

    /// Server-side overrides read through `lookup`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvValue` if a numeric variable does
    /// not parse.
    pub fn from_server_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Ok(Self {
            base_url: get(ENV_BASE_URL),
            timeout_ms: get(ENV_TIMEOUT)
                .map(|v| parse_env(ENV_TIMEOUT, &v))
                .transpose()?,
            headers: None,
            retry_attempts: get(ENV_RETRY_ATTEMPTS)
                .map(|v| parse_env(ENV_RETRY_ATTEMPTS, &v))
                .transpose()?,
            retry_delay_ms: get(ENV_RETRY_DELAY)
                .map(|v| parse_env(ENV_RETRY_DELAY, &v))
                .transpose()?,
        })
    }
}

fn parse_env<T: FromStr>(var: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnvValue {
            var: var.to_string(),
            value: value.to_string(),
        })
}

impl From<ApiConfig> for ApiConfigOverrides {
    fn from(config: ApiConfig) -> Self {
        Self {
            base_url: Some(config.base_url),
            timeout_ms: Some(config.timeout_ms),
            headers: Some(config.headers),
            retry_attempts: Some(config.retry_attempts),
            retry_delay_ms: Some(config.retry_delay_ms),
        }
    }
}

/// Named configuration bundles for well-known backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiPreset {
    /// <https://dummyjson.com>
    #[serde(rename = "dummyjson")]
    DummyJson,
    /// <https://jsonplaceholder.typicode.com>
    #[serde(rename = "jsonplaceholder")]
    JsonPlaceholder,
    /// Local development backend
    Custom,
}

impl ApiPreset {
    /// All presets, in declaration order
    pub const ALL: [ApiPreset; 3] = [Self::DummyJson, Self::JsonPlaceholder, Self::Custom];

    /// Preset name as used in configuration files and on the command line
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::DummyJson => "dummyjson",
            Self::JsonPlaceholder => "jsonplaceholder",
            Self::Custom => "custom",
        }
    }

    /// The full configuration this preset stands for
    #[must_use]
    pub fn config(self) -> ApiConfig {
        let (base_url, timeout_ms, retry_attempts, retry_delay_ms) = match self {
            Self::DummyJson => (DEFAULT_BASE_URL, 10_000, 3, 1_000),
            Self::JsonPlaceholder => ("https://jsonplaceholder.typicode.com", 8_000, 2, 500),
            Self::Custom => ("http://localhost:3001", 15_000, 5, 2_000),
        };
        ApiConfig::builder()
            .base_url(base_url)
            .timeout_ms(timeout_ms)
            .retry_attempts(retry_attempts)
            .retry_delay_ms(retry_delay_ms)
            .build()
    }
}

impl FromStr for ApiPreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

impl std::fmt::Display for ApiPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Deployment environments with their own base URL and timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development against DummyJSON
    Development,
    /// Staging backend
    Staging,
    /// Production backend
    Production,
}

impl Environment {
    /// The configuration used in this environment
    #[must_use]
    pub fn config(self) -> ApiConfig {
        let (base_url, timeout_ms) = match self {
            Self::Development => (DEFAULT_BASE_URL, 15_000),
            Self::Staging => ("https://staging-api.example.com", 12_000),
            Self::Production => ("https://api.example.com", 8_000),
        };
        ApiConfig::builder()
            .base_url(base_url)
            .timeout_ms(timeout_ms)
            .build()
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(ConfigError::UnknownEnvironment(s.to_string())),
        }
    }
}

/// Layered configuration builder
///
/// Layers are applied defaults → environment → preset → explicit
/// overrides, regardless of the order the setters are called in.
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    base: Option<ApiConfig>,
    environment: ApiConfigOverrides,
    preset: Option<ApiPreset>,
    overrides: ApiConfigOverrides,
}

impl ConfigResolver {
    /// Start from the built-in defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a deployment environment instead of the built-in defaults
    #[must_use]
    pub fn for_environment(env: Environment) -> Self {
        Self {
            base: Some(env.config()),
            ..Self::default()
        }
    }

    /// Set the environment override layer
    #[must_use]
    pub fn environment(mut self, overrides: ApiConfigOverrides) -> Self {
        self.environment = overrides;
        self
    }

    /// Select a preset
    #[must_use]
    pub fn preset(mut self, preset: ApiPreset) -> Self {
        self.preset = Some(preset);
        self
    }

    /// Set the explicit override layer
    #[must_use]
    pub fn overrides(mut self, overrides: ApiConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Merge all layers and validate the result
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the merged configuration is invalid.
    pub fn resolve(self) -> Result<ApiConfig, ConfigError> {
        let mut config = self.base.unwrap_or_default().merged(&self.environment);
        if let Some(preset) = self.preset {
            config = config.merged(&preset.config().into());
        }
        let config = config.merged(&self.overrides);
        config.check()?;

        tracing::debug!(
            base_url = %config.base_url,
            timeout_ms = config.timeout_ms,
            preset = ?self.preset,
            "Resolved API configuration"
        );
        Ok(config)
    }
}

/// Resolve defaults → `environment_overrides` → `preset`
///
/// # Errors
///
/// Returns a `ConfigError` if the merged configuration is invalid.
pub fn resolve(
    environment_overrides: ApiConfigOverrides,
    preset: Option<ApiPreset>,
) -> Result<ApiConfig, ConfigError> {
    let resolver = ConfigResolver::new().environment(environment_overrides);
    match preset {
        Some(preset) => resolver.preset(preset).resolve(),
        None => resolver.resolve(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "https://dummyjson.com");
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.retry_delay_ms, 1_000);
        assert_eq!(
            config.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_overrides_win_and_unset_fields_keep_defaults() {
        let env = ApiConfigOverrides {
            base_url: Some("https://example.org/api".to_string()),
            timeout_ms: Some(2_500),
            ..ApiConfigOverrides::default()
        };
        let config = resolve(env, None).unwrap();
        assert_eq!(config.base_url, "https://example.org/api");
        assert_eq!(config.timeout_ms, 2_500);
        assert_eq!(config.retry_attempts, DEFAULT_RETRY_ATTEMPTS);
        assert_eq!(config.retry_delay_ms, DEFAULT_RETRY_DELAY_MS);
    }

    #[test]
    fn test_preset_beats_environment() {
        let env = ApiConfigOverrides::base_url("https://example.org");
        let config = resolve(env, Some(ApiPreset::Custom)).unwrap();
        assert_eq!(config.base_url, "http://localhost:3001");
        assert_eq!(config.retry_attempts, 5);
    }

    #[test]
    fn test_explicit_overrides_beat_preset() {
        let config = ConfigResolver::new()
            .overrides(ApiConfigOverrides {
                timeout_ms: Some(1),
                ..ApiConfigOverrides::default()
            })
            .preset(ApiPreset::JsonPlaceholder)
            .resolve()
            .unwrap();
        assert_eq!(config.base_url, "https://jsonplaceholder.typicode.com");
        assert_eq!(config.timeout_ms, 1);
    }

    #[test]
    fn test_resolve_rejects_invalid() {
        let err = resolve(ApiConfigOverrides::base_url("not a url"), None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));

        let zero = ApiConfigOverrides {
            timeout_ms: Some(0),
            ..ApiConfigOverrides::default()
        };
        assert_eq!(resolve(zero, None), Err(ConfigError::InvalidTimeout));
    }

    #[test]
    fn test_validate() {
        assert!(validate(&ApiConfig::default()));
        assert!(!validate(&ApiConfig::builder().base_url("/relative").build()));
        assert!(!validate(&ApiConfig::builder().timeout_ms(0).build()));
    }

    #[test]
    fn test_public_env_only_reads_public_variable() {
        let overrides = ApiConfigOverrides::from_public_lookup(lookup(&[
            (ENV_PUBLIC_BASE_URL, "https://public.example.com"),
            (ENV_TIMEOUT, "5"),
        ]));
        assert_eq!(
            overrides,
            ApiConfigOverrides::base_url("https://public.example.com")
        );
    }

    #[test]
    fn test_server_env() {
        let overrides = ApiConfigOverrides::from_server_lookup(lookup(&[
            (ENV_BASE_URL, "https://internal.example.com"),
            (ENV_TIMEOUT, "3000"),
            (ENV_RETRY_ATTEMPTS, "0"),
            (ENV_RETRY_DELAY, ""),
        ]))
        .unwrap();
        assert_eq!(overrides.base_url.as_deref(), Some("https://internal.example.com"));
        assert_eq!(overrides.timeout_ms, Some(3000));
        assert_eq!(overrides.retry_attempts, Some(0));
        assert_eq!(overrides.retry_delay_ms, None);
    }

    #[test]
    fn test_server_env_rejects_garbage() {
        let err =
            ApiConfigOverrides::from_server_lookup(lookup(&[(ENV_RETRY_ATTEMPTS, "-1")]))
                .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidEnvValue {
                var: ENV_RETRY_ATTEMPTS.to_string(),
                value: "-1".to_string(),
            }
        );
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("dummyjson".parse::<ApiPreset>(), Ok(ApiPreset::DummyJson));
        assert_eq!(
            "JSONPlaceholder".parse::<ApiPreset>(),
            Ok(ApiPreset::JsonPlaceholder)
        );
        assert!(matches!(
            "nope".parse::<ApiPreset>(),
            Err(ConfigError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_environment_configs() {
        let prod = ConfigResolver::for_environment(Environment::Production)
            .resolve()
            .unwrap();
        assert_eq!(prod.base_url, "https://api.example.com");
        assert_eq!(prod.timeout_ms, 8_000);
        assert_eq!("dev".parse::<Environment>(), Ok(Environment::Development));
    }

    #[test]
    fn test_config_json_shape() {
        let value = serde_json::to_value(ApiConfig::default()).unwrap();
        assert_eq!(value["baseURL"], "https://dummyjson.com");
        assert_eq!(value["timeoutMs"], 10_000);
    }
}
