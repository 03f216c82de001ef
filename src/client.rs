//! HTTP client with a two-stage interceptor pipeline
//!
//! Every call made through [`HttpClient`] passes through:
//!
//! 1. **Request stage**: in the client execution context, the session
//!    token held by the client's [`TokenStore`] is attached as a bearer
//!    credential. Server-side calls carry no implicit credentials.
//! 2. **Response stage**: successes pass through untouched; every failure
//!    is normalised into an [`ApiError`]. A 401 additionally clears the
//!    client-side token.
//!
//! # Reconfiguration
//!
//! ```text
//! ┌──────────────┐   snapshot (Arc clone)   ┌─────────────────────┐
//! │  HttpClient  │ ───────────────────────→ │ Transport (config + │
//! │ RwLock<Arc<> │                          │   reqwest::Client)  │
//! └──────┬───────┘                          └─────────────────────┘
//!        │ reconfigure(): build new Transport, swap the Arc
//!        ▼
//! ```
//!
//! A call takes its transport snapshot when it starts, so calls already in
//! flight finish against the configuration they began with. Nothing is
//! cancelled by [`HttpClient::reconfigure`]; only later calls see the new
//! configuration.
//!
//! # Example
//!
//! ```no_run
//! use userdesk_sdk::{ApiConfig, HttpClient, TokenStore};
//!
//! # async fn example() -> userdesk_sdk::Result<()> {
//! let tokens = TokenStore::client();
//! let client = HttpClient::new(ApiConfig::default(), tokens.clone())?;
//!
//! tokens.set("eyJ...");
//! let response = client.get("/auth/me").await?;
//! println!("{}", response.data);
//! # Ok(())
//! # }
//! ```

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use typed_builder::TypedBuilder;

pub use reqwest::Method;

use crate::auth::TokenStore;
use crate::config::{ApiConfig, ApiConfigOverrides};
use crate::context::ExecutionContext;
use crate::error::{ApiError, ConfigError, Result};

/// Per-call options
#[derive(Debug, Clone, Default, TypedBuilder)]
#[builder(
    builder_method(doc = "Create a new builder for RequestOptions"),
    builder_type(doc = "Builder for RequestOptions", vis = "pub"),
    build_method(doc = "Build the RequestOptions")
)]
pub struct RequestOptions {
    /// Override the configured timeout for this call
    #[builder(default, setter(strip_option))]
    pub timeout: Option<Duration>,

    /// Do not attach the session token
    #[builder(default)]
    pub skip_auth: bool,

    /// Query string parameters
    #[builder(default, setter(into))]
    pub query: Vec<(String, String)>,

    /// Extra headers for this call
    #[builder(default)]
    pub headers: HashMap<String, String>,
}

/// A successful response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers (lower-case names)
    pub headers: HashMap<String, String>,
    /// Parsed JSON body; non-JSON bodies are kept as a string, empty ones as null
    pub data: serde_json::Value,
}

impl ApiResponse {
    /// Deserialize the body
    ///
    /// # Errors
    ///
    /// Returns an error if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        T::deserialize(&self.data)
    }

    /// Take the body
    #[must_use]
    pub fn into_data(self) -> serde_json::Value {
        self.data
    }
}

/// Why a call failed, before normalisation
#[derive(Debug)]
enum Failure {
    /// A response arrived with a non-success status
    Status {
        status: u16,
        body: serde_json::Value,
    },
    /// The request went out but no response came back
    NoResponse(String),
    /// The request could not be built or dispatched
    Setup(String),
}

impl Failure {
    fn from_reqwest(e: &reqwest::Error) -> Self {
        let text = error_chain(e);
        if e.is_builder() {
            Self::Setup(text)
        } else {
            Self::NoResponse(text)
        }
    }
}

fn error_chain(e: &(dyn std::error::Error + 'static)) -> String {
    let mut text = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

/// Whether `url` starts with a scheme (`https://`) or is protocol-relative
/// (`//host`)
#[must_use]
pub fn is_absolute_url(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }
    let Some((scheme, rest)) = url.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    rest.starts_with("//")
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Join a request path onto the base URL
///
/// Absolute URLs pass through unchanged.
#[must_use]
pub fn join_url(base_url: &str, url: &str) -> String {
    if is_absolute_url(url) {
        return url.to_string();
    }
    if url.is_empty() {
        return base_url.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        url.trim_start_matches('/')
    )
}

/// One configured underlying client
#[derive(Debug)]
struct Transport {
    config: ApiConfig,
    http: reqwest::Client,
}

impl Transport {
    fn build(config: ApiConfig) -> Result<Self> {
        config.check()?;

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let invalid = || ConfigError::InvalidHeader { name: name.clone() };
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            headers.insert(header_name, header_value);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self { config, http })
    }
}

/// HTTP client bound to one session's [`TokenStore`]
///
/// Clones share the underlying transport and token slot.
#[derive(Debug, Clone)]
pub struct HttpClient {
    transport: Arc<RwLock<Arc<Transport>>>,
    tokens: TokenStore,
}

impl HttpClient {
    /// Create a client from a configuration and the session's token store
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the underlying
    /// client cannot be built.
    pub fn new(config: ApiConfig, tokens: TokenStore) -> Result<Self> {
        let transport = Transport::build(config)?;
        tracing::debug!(
            base_url = %transport.config.base_url,
            context = %tokens.context(),
            "Created API client"
        );
        Ok(Self {
            transport: Arc::new(RwLock::new(Arc::new(transport))),
            tokens,
        })
    }

    /// The token store this client reads from
    #[must_use]
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Execution context of the bound token store
    #[must_use]
    pub fn context(&self) -> ExecutionContext {
        self.tokens.context()
    }

    /// Current configuration
    #[must_use]
    pub fn config(&self) -> ApiConfig {
        self.snapshot().config.clone()
    }

    fn snapshot(&self) -> Arc<Transport> {
        match self.transport.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Merge `overrides` into the current configuration and swap in a new
    /// underlying client
    ///
    /// Calls already in flight complete against the previous configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged configuration is invalid; the client
    /// keeps its current configuration in that case.
    pub fn reconfigure(&self, overrides: &ApiConfigOverrides) -> Result<ApiConfig> {
        let updated = self.config().merged(overrides);
        let transport = Arc::new(Transport::build(updated.clone())?);

        match self.transport.write() {
            Ok(mut guard) => *guard = transport,
            Err(poisoned) => *poisoned.into_inner() = transport,
        }

        tracing::info!(
            base_url = %updated.base_url,
            timeout_ms = updated.timeout_ms,
            "API client reconfigured"
        );
        Ok(updated)
    }

    /// Issue a request through both interceptor stages
    ///
    /// # Errors
    ///
    /// Returns a normalised [`ApiError`] for any failure.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<serde_json::Value>,
        options: Option<RequestOptions>,
    ) -> std::result::Result<ApiResponse, ApiError> {
        let transport = self.snapshot();
        let options = options.unwrap_or_default();
        let full_url = join_url(&transport.config.base_url, url);

        let mut builder = transport.http.request(method.clone(), &full_url);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        for (name, value) in &options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }
        builder = self.attach_credentials(builder, url, options.skip_auth);

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return Err(self.reject(&method, url, Failure::from_reqwest(&e))),
        };

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return Err(self.reject(&method, url, Failure::from_reqwest(&e))),
        };
        let data = parse_body(&bytes);

        if status.is_success() {
            Ok(ApiResponse {
                status: status.as_u16(),
                headers,
                data,
            })
        } else {
            Err(self.reject(
                &method,
                url,
                Failure::Status {
                    status: status.as_u16(),
                    body: data,
                },
            ))
        }
    }

    /// Request stage
    fn attach_credentials(
        &self,
        builder: reqwest::RequestBuilder,
        url: &str,
        skip_auth: bool,
    ) -> reqwest::RequestBuilder {
        if self.context().is_server() {
            tracing::debug!(url, "Server-side request (no token attached)");
            return builder;
        }
        if skip_auth {
            tracing::debug!(url, "Auth skipped for request");
            return builder;
        }
        match self.tokens.get() {
            Some(token) => {
                tracing::debug!(url, "Added session auth header for request");
                builder.bearer_auth(token.as_str())
            }
            None => {
                tracing::debug!(url, "No session token for request");
                builder
            }
        }
    }

    /// Response stage, failure branch
    fn reject(&self, method: &Method, url: &str, failure: Failure) -> ApiError {
        match failure {
            Failure::Status { status, body } => {
                if status == 401 && self.context().is_client() {
                    self.tokens.clear();
                    tracing::info!("Authentication failed - session token cleared");
                }
                let transport_message = format!("Request failed with status code {status}");
                let error = ApiError::from_status(status, body, &transport_message);
                tracing::debug!(%method, url, status, message = %error.message, "Request failed");
                error
            }
            Failure::NoResponse(reason) => {
                tracing::error!(%method, url, "Network error: {reason}");
                ApiError::network()
            }
            Failure::Setup(reason) => {
                tracing::error!(%method, url, "Request setup error: {reason}");
                ApiError::request_setup(reason)
            }
        }
    }

    /// `GET url`
    ///
    /// # Errors
    ///
    /// Returns a normalised [`ApiError`] for any failure.
    pub async fn get(&self, url: &str) -> std::result::Result<ApiResponse, ApiError> {
        self.request(Method::GET, url, None, None).await
    }

    /// `POST url` with a JSON body
    ///
    /// # Errors
    ///
    /// Returns a normalised [`ApiError`] for any failure.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> std::result::Result<ApiResponse, ApiError> {
        self.request(Method::POST, url, Some(encode_body(body)?), None)
            .await
    }

    /// `PUT url` with a JSON body
    ///
    /// # Errors
    ///
    /// Returns a normalised [`ApiError`] for any failure.
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> std::result::Result<ApiResponse, ApiError> {
        self.request(Method::PUT, url, Some(encode_body(body)?), None)
            .await
    }

    /// `PATCH url` with a JSON body
    ///
    /// # Errors
    ///
    /// Returns a normalised [`ApiError`] for any failure.
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> std::result::Result<ApiResponse, ApiError> {
        self.request(Method::PATCH, url, Some(encode_body(body)?), None)
            .await
    }

    /// `DELETE url`
    ///
    /// # Errors
    ///
    /// Returns a normalised [`ApiError`] for any failure.
    pub async fn delete(&self, url: &str) -> std::result::Result<ApiResponse, ApiError> {
        self.request(Method::DELETE, url, None, None).await
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> std::result::Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::request_setup(e.to_string()))
}

fn parse_body(bytes: &[u8]) -> serde_json::Value {
    if bytes.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://dummyjson.com", "/users"),
            "https://dummyjson.com/users"
        );
        assert_eq!(
            join_url("https://example.com/api/", "users?limit=5"),
            "https://example.com/api/users?limit=5"
        );
        assert_eq!(
            join_url("https://dummyjson.com", "https://other.example/x"),
            "https://other.example/x"
        );
        assert_eq!(join_url("https://dummyjson.com", ""), "https://dummyjson.com");
        assert_eq!(
            join_url("https://dummyjson.com", "/redirect?to=https://example.com"),
            "https://dummyjson.com/redirect?to=https://example.com"
        );
    }

    #[test]
    fn test_is_absolute_url() {
        assert!(is_absolute_url("https://dummyjson.com/users"));
        assert!(is_absolute_url("svn+ssh://host/repo"));
        assert!(is_absolute_url("//cdn.example.com/a.png"));
        assert!(!is_absolute_url("/users"));
        assert!(!is_absolute_url("users?next=https://x.example"));
        assert!(!is_absolute_url("/redirect?to=https://example.com"));
        assert!(!is_absolute_url("1http://nope"));
        assert!(!is_absolute_url("mailto:a@b.c"));
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(b""), serde_json::Value::Null);
        assert_eq!(parse_body(br#"{"a":1}"#)["a"], 1);
        assert_eq!(
            parse_body(b"<html>oops</html>"),
            serde_json::Value::String("<html>oops</html>".to_string())
        );
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ApiConfig::builder().base_url("nope").build();
        assert!(HttpClient::new(config, TokenStore::client()).is_err());

        let mut headers = HashMap::new();
        headers.insert("bad header".to_string(), "x".to_string());
        let config = ApiConfig::builder().headers(headers).build();
        let err = HttpClient::new(config, TokenStore::client()).unwrap_err();
        assert!(matches!(
            err,
            crate::SdkError::Config(ConfigError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_reconfigure_merges_and_keeps_old_on_error() {
        let client = HttpClient::new(ApiConfig::default(), TokenStore::client()).unwrap();

        let updated = client
            .reconfigure(&ApiConfigOverrides {
                timeout_ms: Some(500),
                ..ApiConfigOverrides::default()
            })
            .unwrap();
        assert_eq!(updated.timeout_ms, 500);
        assert_eq!(updated.base_url, "https://dummyjson.com");
        assert_eq!(client.config().timeout_ms, 500);

        assert!(
            client
                .reconfigure(&ApiConfigOverrides::base_url("::bad::"))
                .is_err()
        );
        assert_eq!(client.config().base_url, "https://dummyjson.com");
    }

    #[test]
    fn test_clones_share_reconfiguration() {
        let client = HttpClient::new(ApiConfig::default(), TokenStore::client()).unwrap();
        let other = client.clone();
        client
            .reconfigure(&ApiConfigOverrides::base_url("http://localhost:9000"))
            .unwrap();
        assert_eq!(other.config().base_url, "http://localhost:9000");
    }
}
