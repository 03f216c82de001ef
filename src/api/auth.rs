//! Auth endpoints

use serde::Serialize;
use serde_json::Value;

use super::{call, failed};
use crate::client::{HttpClient, Method};
use crate::error::Result;
use crate::types::{
    LoginCredentials, LoginResponse, RefreshTokenRequest, RegisterData, Schema, User, parse,
};

/// Login, token refresh, registration and profile lookup
///
/// Calls that issue a token store it in the client's
/// [`TokenStore`](crate::TokenStore), so later calls through the same
/// client are authenticated.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: HttpClient,
}

impl AuthApi {
    /// Call the auth endpoints through `client`
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Sign in with username and password
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Operation`](crate::SdkError::Operation)
    /// ("Login failed") if the credentials are malformed, the call fails or
    /// the response does not validate.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse> {
        tracing::debug!(username = %credentials.username, "Logging in");
        self.issue("/auth/login", credentials)
            .await
            .map_err(|e| failed("Login failed", e))
    }

    /// Exchange a refresh token for a new access token
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Operation`](crate::SdkError::Operation)
    /// ("Token refresh failed") on any failure.
    pub async fn refresh(&self, request: &RefreshTokenRequest) -> Result<LoginResponse> {
        self.issue("/auth/refresh", request)
            .await
            .map_err(|e| failed("Token refresh failed", e))
    }

    /// Create an account and sign in as it
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Operation`](crate::SdkError::Operation)
    /// ("Registration failed") on any failure.
    pub async fn register(&self, data: &RegisterData) -> Result<LoginResponse> {
        self.issue("/auth/register", data)
            .await
            .map_err(|e| failed("Registration failed", e))
    }

    /// Forget the stored token
    ///
    /// Local only; the backend keeps no session to end.
    pub fn logout(&self) {
        self.client.tokens().clear();
        tracing::info!("Logged out");
    }

    /// The signed-in user's profile
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Operation`](crate::SdkError::Operation)
    /// ("Failed to fetch user profile") on any failure.
    pub async fn profile(&self) -> Result<User> {
        call(&self.client, Method::GET, "/auth/me", None, None)
            .await
            .map_err(|e| failed("Failed to fetch user profile", e))
    }

    async fn issue<B: Schema + Serialize>(&self, url: &str, body: &B) -> Result<LoginResponse> {
        let body = validated(body)?;
        let response: LoginResponse = call(&self.client, Method::POST, url, Some(body), None).await?;
        self.client.tokens().set(response.access_token.as_str());
        tracing::info!(user_id = response.id, "Session token issued");
        Ok(response)
    }
}

/// Check an outgoing payload against its own schema
fn validated<B: Schema + Serialize>(body: &B) -> Result<Value> {
    let raw = serde_json::to_value(body)?;
    parse::<B>(raw.clone())?;
    Ok(raw)
}
