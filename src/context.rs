//! Where the SDK is running
//!
//! Client-side code owns a user's session: it may read and write the
//! client-local token store and attaches the session token to outbound
//! requests. Server-side code never touches client-local storage and sends
//! no implicit credentials.

use serde::{Deserialize, Serialize};

/// Execution context a client, token store or session bridge is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionContext {
    /// Runs on behalf of a signed-in user
    Client,
    /// Server-rendered or backend execution
    Server,
}

impl ExecutionContext {
    /// Whether this is the client-side context
    #[must_use]
    pub fn is_client(self) -> bool {
        matches!(self, Self::Client)
    }

    /// Whether this is the server-side context
    #[must_use]
    pub fn is_server(self) -> bool {
        matches!(self, Self::Server)
    }
}

impl std::fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Client => f.write_str("client"),
            Self::Server => f.write_str("server"),
        }
    }
}
