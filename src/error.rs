//! Error types for the userdesk SDK

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Normalised failure produced by the HTTP client's response stage
///
/// Every failed call is reduced to this shape. `message` is always
/// populated with a human readable string; the other fields are filled in
/// only when the failure carried that information.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ApiError {
    /// Human readable description
    pub message: String,
    /// HTTP status code, when a response was received
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Machine readable error code, when the server supplied one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Raw response body of the failed call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Message used when a request was sent but no response arrived
    pub const NETWORK_MESSAGE: &'static str = "Network error - please check your connection";

    /// Classify a response that came back with a non-success status
    ///
    /// The server's `message` field wins over `transport_message`, then the
    /// status specific overrides are applied on top.
    #[must_use]
    pub fn from_status(status: u16, body: serde_json::Value, transport_message: &str) -> Self {
        let server_message = body
            .get("message")
            .and_then(serde_json::Value::as_str)
            .filter(|m| !m.is_empty());
        let code = body
            .get("code")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);

        let message = match status {
            401 => "Authentication required".to_string(),
            403 => "Access denied".to_string(),
            404 => "Resource not found".to_string(),
            s if s >= 500 => "Server error occurred".to_string(),
            _ => server_message.unwrap_or(transport_message).to_string(),
        };

        let details = if body.is_null() { None } else { Some(body) };

        Self {
            message,
            status: Some(status),
            code,
            details,
        }
    }

    /// Request went out but nothing came back
    #[must_use]
    pub fn network() -> Self {
        Self {
            message: Self::NETWORK_MESSAGE.to_string(),
            status: None,
            code: None,
            details: None,
        }
    }

    /// Request could not be constructed or dispatched
    pub fn request_setup(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            status: None,
            code: None,
            details: None,
        }
    }

    /// True when the server rejected the caller's credentials or rights
    #[must_use]
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self.status, Some(400 | 401 | 403))
    }
}

/// A single schema violation, addressed by its dotted field path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Dotted path of the offending field (e.g. `address.city`)
    pub path: String,
    /// What was wrong with it
    pub message: String,
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Payload did not conform to its schema
///
/// Carries every violation found, not only the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Schema validation failed: {}", join_violations(.violations))]
pub struct SchemaError {
    /// All violations, in field order
    pub violations: Vec<FieldViolation>,
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl SchemaError {
    /// Whether any violation was reported for `path`
    #[must_use]
    pub fn has_violation(&self, path: &str) -> bool {
        self.violations.iter().any(|v| v.path == path)
    }
}

/// Invalid or unparseable client configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Base URL is not an absolute URL
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// Offending value
        url: String,
        /// Parser message
        reason: String,
    },

    /// Timeout must be strictly positive
    #[error("Invalid timeout: must be greater than 0 ms")]
    InvalidTimeout,

    /// Default header cannot be sent over HTTP
    #[error("Invalid header '{name}'")]
    InvalidHeader {
        /// Header name
        name: String,
    },

    /// Environment variable holds a value of the wrong type
    #[error("Invalid value for {var}: '{value}'")]
    InvalidEnvValue {
        /// Variable name
        var: String,
        /// Raw value
        value: String,
    },

    /// No preset with that name
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    /// No deployment environment with that name
    #[error("Unknown environment: {0}")]
    UnknownEnvironment(String),
}

/// Errors raised by the client-local token store
#[derive(Debug, Error)]
pub enum TokenError {
    /// I/O error while reading or writing the store
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Store contents are not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main error type for the userdesk SDK
#[derive(Error, Debug)]
pub enum SdkError {
    /// Normalised API failure
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Payload failed schema validation
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Configuration rejected
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Local token storage failure
    #[error("Token storage error: {0}")]
    Token(#[from] TokenError),

    /// JSON encode or decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Underlying HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A public operation failed; the cause is kept as the error source
    #[error("{operation}")]
    Operation {
        /// Short description of what failed (e.g. "Failed to fetch users")
        operation: String,
        /// What actually went wrong
        #[source]
        source: Box<SdkError>,
    },
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

impl SdkError {
    /// Wrap `source` as the cause of a failed operation
    pub fn operation(operation: impl Into<String>, source: impl Into<SdkError>) -> Self {
        Self::Operation {
            operation: operation.into(),
            source: Box::new(source.into()),
        }
    }

    /// The normalised API error at the root of this error, if any
    #[must_use]
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            Self::Operation { source, .. } => source.api_error(),
            _ => None,
        }
    }

    /// The schema error at the root of this error, if any
    #[must_use]
    pub fn schema_error(&self) -> Option<&SchemaError> {
        match self {
            Self::Schema(e) => Some(e),
            Self::Operation { source, .. } => source.schema_error(),
            _ => None,
        }
    }
}
