//! Bridge from an externally managed session into the HTTP client
//!
//! The identity subsystem that owns the session (sign-in pages, cookies,
//! refresh) lives outside this crate. Whenever it hands over a new view of
//! the session, call [`SessionBridge::sync`] so the token slot read by
//! [`HttpClient`](crate::HttpClient) matches it.

use serde::{Deserialize, Serialize};

use crate::auth::TokenStore;
use crate::types::SessionToken;

/// User portion of an external session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Subject identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Session object owned by the external identity subsystem
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSession {
    /// Signed-in user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
    /// Bearer token issued at sign-in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Session expiry as an ISO-8601 timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
}

impl ExternalSession {
    /// The session's token, if it carries a non-empty one
    #[must_use]
    pub fn token(&self) -> Option<SessionToken> {
        self.access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(SessionToken::from)
    }
}

/// One-directional sync from an [`ExternalSession`] into a [`TokenStore`]
#[derive(Debug, Clone)]
pub struct SessionBridge {
    tokens: TokenStore,
}

impl SessionBridge {
    /// Bridge into `tokens`
    #[must_use]
    pub fn new(tokens: TokenStore) -> Self {
        Self { tokens }
    }

    /// Copy the session's token into the store, or clear the store when
    /// the session is absent or carries no token
    ///
    /// No-op in the server context.
    pub fn sync(&self, session: Option<&ExternalSession>) {
        if self.tokens.context().is_server() {
            return;
        }

        match session.and_then(ExternalSession::token) {
            Some(token) => {
                self.tokens.set(token);
                tracing::debug!("Session token synced with API client");
            }
            None => {
                self.tokens.clear();
                tracing::debug!("Session token cleared from API client");
            }
        }
    }
}
