//! Token storage and credential sign-in
//!
//! # Overview
//!
//! - [`TokenStore`] holds the bearer token for one session. It is shared by
//!   the [`HttpClient`](crate::HttpClient), the
//!   [`SessionBridge`](crate::SessionBridge) and the endpoint APIs, and can
//!   write through to a [`LocalStore`] so the token survives restarts.
//! - [`Authenticator`] exchanges username/password credentials for an
//!   [`AuthenticatedUser`]; failures are reported as an [`AuthOutcome`],
//!   never as errors.
//! - [`project_claims`] and [`project_session`] carry the user ID and token
//!   from a sign-in into the externally owned session.
//!
//! # Example
//!
//! ```no_run
//! use serde_json::json;
//! use userdesk_sdk::auth::{AuthOutcome, Authenticator, TokenStore};
//! use userdesk_sdk::{ApiConfig, HttpClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpClient::new(ApiConfig::default(), TokenStore::client())?;
//!     let auth = Authenticator::new(client);
//!
//!     match auth
//!         .sign_in(json!({"username": "emilys", "password": "emilyspass"}))
//!         .await
//!     {
//!         AuthOutcome::Success(user) => println!("Signed in as {}", user.id),
//!         AuthOutcome::InvalidCredentials => println!("Wrong username or password"),
//!         AuthOutcome::TransportFailure(e) => println!("Backend unavailable: {e}"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Security
//!
//! - Tokens never appear in `Debug` output or log lines
//! - The file-backed local store is written with user-only permissions (600)
//! - In the server context the token store ignores writes and reads nothing

mod flow;
mod projection;
mod token;

pub use flow::{AuthOutcome, AuthenticatedUser, Authenticator, LOGIN_PATH};
pub use projection::{
    SESSION_MAX_AGE, SessionClaims, project_claims, project_session, session_for,
};
pub use token::{
    FileLocalStore, LocalStore, MemoryLocalStore, TOKEN_KEY, TokenStore, is_token_valid,
    token_payload,
};
