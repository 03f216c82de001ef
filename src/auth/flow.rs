//! Credential sign-in against the backend

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::HttpClient;
use crate::error::ApiError;
use crate::types::{SignInCredentials, parse};

/// Backend sign-in endpoint
pub const LOGIN_PATH: &str = "/auth/login";

/// Session-facing view of a signed-in user
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    /// Subject identifier
    pub id: String,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Bearer token issued at sign-in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl std::fmt::Debug for AuthenticatedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedUser")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("image", &self.image)
            .field("has_access_token", &self.access_token.is_some())
            .finish()
    }
}

impl AuthenticatedUser {
    /// Map a backend sign-in response
    ///
    /// Returns `None` unless the response carries both a non-empty
    /// `accessToken` and an `id`.
    #[must_use]
    pub fn from_login_response(data: &Value) -> Option<Self> {
        let access_token = non_empty_str(data, "accessToken")?;
        let id = match data.get("id")? {
            Value::Number(n) if n.as_f64() != Some(0.0) => number_id(n),
            Value::String(s) if !s.is_empty() => s.clone(),
            _ => return None,
        };

        let name_parts: Vec<&str> = ["firstName", "lastName"]
            .into_iter()
            .filter_map(|key| data.get(key).and_then(Value::as_str))
            .filter(|part| !part.is_empty())
            .collect();
        let name = (!name_parts.is_empty()).then(|| name_parts.join(" "));

        Some(Self {
            id,
            email: non_empty_str(data, "email").map(str::to_string),
            name,
            image: non_empty_str(data, "image").map(str::to_string),
            access_token: Some(access_token.to_string()),
        })
    }
}

/// Render a numeric id the way JavaScript prints numbers: `1.0` as `"1"`
fn number_id(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

fn non_empty_str<'a>(data: &'a Value, key: &str) -> Option<&'a str> {
    data.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Result of a sign-in attempt
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    /// Credentials accepted
    Success(AuthenticatedUser),
    /// Malformed credentials, rejected by the backend, or no token issued
    InvalidCredentials,
    /// The backend could not be reached or failed
    TransportFailure(ApiError),
}

impl AuthOutcome {
    /// The signed-in user, discarding why a failure happened
    #[must_use]
    pub fn into_user(self) -> Option<AuthenticatedUser> {
        match self {
            Self::Success(user) => Some(user),
            Self::InvalidCredentials | Self::TransportFailure(_) => None,
        }
    }

    /// Whether sign-in succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Exchanges credentials for an [`AuthenticatedUser`]
///
/// Never returns an error: every failure is folded into [`AuthOutcome`].
#[derive(Debug, Clone)]
pub struct Authenticator {
    client: HttpClient,
}

impl Authenticator {
    /// Sign in through `client`
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Validate `credentials`, call the backend and map its response
    pub async fn sign_in(&self, credentials: Value) -> AuthOutcome {
        let credentials: SignInCredentials = match parse(credentials) {
            Ok(credentials) => credentials,
            Err(e) => {
                tracing::debug!("Rejected malformed credentials: {e}");
                return AuthOutcome::InvalidCredentials;
            }
        };
        tracing::debug!(username = %credentials.username, "Signing in");

        let response = match self.client.post(LOGIN_PATH, &credentials).await {
            Ok(response) => response,
            Err(e) if e.is_auth_rejection() => {
                tracing::info!(username = %credentials.username, "Sign-in rejected: {e}");
                return AuthOutcome::InvalidCredentials;
            }
            Err(e) => {
                tracing::error!(username = %credentials.username, "Authentication error: {e}");
                return AuthOutcome::TransportFailure(e);
            }
        };

        match AuthenticatedUser::from_login_response(&response.data) {
            Some(user) => {
                tracing::info!(user_id = %user.id, "Signed in");
                AuthOutcome::Success(user)
            }
            None => {
                tracing::warn!("No accessToken or id in sign-in response");
                AuthOutcome::InvalidCredentials
            }
        }
    }

    /// Sign in, returning the user on success and `None` for any failure
    pub async fn authenticate(&self, credentials: Value) -> Option<AuthenticatedUser> {
        self.sign_in(credentials).await.into_user()
    }
}
