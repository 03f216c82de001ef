//! # Userdesk SDK
//!
//! Session-aware HTTP client for the Userdesk demo backend (a DummyJSON
//! style REST API). Async/await, strong typing, tokio-based.
//!
//! ## Quick Start
//!
//! ```no_run
//! use userdesk_sdk::{ApiConfig, HttpClient, TokenStore, UsersApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpClient::new(ApiConfig::default(), TokenStore::client())?;
//!     let users = UsersApi::new(client);
//!
//!     let page = users.fetch_users(Some(10), None).await?;
//!     for user in &page.users {
//!         println!("{}: {}", user.id, user.full_name());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Core Features
//!
//! ### 1. Layered Configuration with [`ConfigResolver`]
//!
//! Defaults, a deployment [`Environment`], a named [`ApiPreset`] and
//! explicit overrides are merged in that order:
//!
//! ```
//! # use userdesk_sdk::{ApiConfigOverrides, ApiPreset, ConfigResolver, Environment};
//! # fn example() -> userdesk_sdk::Result<()> {
//! let config = ConfigResolver::for_environment(Environment::Production)
//!     .preset(ApiPreset::DummyJson)
//!     .overrides(ApiConfigOverrides::from_server_env()?)
//!     .resolve()?;
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. Session Tokens with [`TokenStore`] and [`SessionBridge`]
//!
//! The token store is the single slot a session's bearer token lives in.
//! The external identity subsystem pushes its session into it through the
//! bridge; the HTTP client reads it on every call:
//!
//! ```no_run
//! # use userdesk_sdk::{ApiConfig, ExternalSession, HttpClient, SessionBridge, TokenStore};
//! # async fn example(session: ExternalSession) -> userdesk_sdk::Result<()> {
//! let tokens = TokenStore::client();
//! let client = HttpClient::new(ApiConfig::default(), tokens.clone())?;
//! SessionBridge::new(tokens).sync(Some(&session));
//!
//! let me = client.get("/auth/me").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. Credential Sign-in with [`Authenticator`]
//!
//! See the [`auth`] module.
//!
//! ## Architecture
//!
//! - [`config`]: Configuration defaults, presets, environments and resolution
//! - [`context`]: Client/server execution context
//! - [`auth`]: Token store, sign-in flow and session projections
//! - [`client`]: HTTP client with request/response interceptors
//! - [`session`]: External session bridge
//! - [`types`]: Domain types and schema validation
//! - [`api`]: Typed user and auth endpoints
//! - [`error`]: Error types and handling
//!
//! ## Logging
//!
//! This crate uses [`tracing`](https://crates.io/crates/tracing) for structured logging.
//! Tracing events are always emitted but are zero-cost when no subscriber is attached.
//! Tokens and passwords are never logged. To see logs, attach a tracing subscriber
//! in your application:
//!
//! ```rust,ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`Result<T, SdkError>`](Result). Endpoint
//! calls wrap their cause in [`SdkError::Operation`]; the normalised
//! transport failure stays reachable:
//!
//! ```no_run
//! # use userdesk_sdk::UsersApi;
//! # async fn example(users: UsersApi) {
//! match users.get_user(9999u64).await {
//!     Ok(user) => println!("{}", user.full_name()),
//!     Err(e) => match e.api_error() {
//!         Some(api) if api.status == Some(404) => eprintln!("No such user"),
//!         _ => eprintln!("Error: {e}"),
//!     },
//! }
//! # }
//! ```
//!
//! Sign-in failures are not errors; they come back as an [`AuthOutcome`].
//!
//! ## Demo
//!
//! `demos/userdesk-cli` signs in and browses users from the command line:
//!
//! ```bash
//! cargo run -p userdesk-cli -- list --limit 5
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use api::{AuthApi, UsersApi};
pub use auth::{AuthOutcome, AuthenticatedUser, Authenticator, TokenStore};
pub use client::{ApiResponse, HttpClient, Method, RequestOptions};
pub use config::{
    ApiConfig, ApiConfigOverrides, ApiPreset, ConfigResolver, Environment, resolve, validate,
};
pub use context::ExecutionContext;
pub use error::{ApiError, ConfigError, FieldViolation, Result, SchemaError, SdkError, TokenError};
pub use session::{ExternalSession, SessionBridge, SessionUser};
pub use types::{SessionToken, User, UserId, UsersResponse};

/// Version of the SDK
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
