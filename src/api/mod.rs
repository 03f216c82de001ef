//! Typed endpoint APIs
//!
//! Thin wrappers over [`HttpClient`] for the backend's user and auth
//! endpoints. Every response is validated against its schema before it is
//! returned, and every failure is reported as [`SdkError::Operation`]
//! carrying the operation name and the underlying cause.

mod auth;
mod users;

pub use auth::AuthApi;
pub use users::{DEFAULT_PAGE_SIZE, UsersApi};

use serde_json::Value;

use crate::client::{HttpClient, Method, RequestOptions};
use crate::error::{Result, SdkError};
use crate::types::{Schema, parse};

/// Issue a request and validate the response body as `T`
async fn call<T: Schema>(
    client: &HttpClient,
    method: Method,
    url: &str,
    body: Option<Value>,
    options: Option<RequestOptions>,
) -> Result<T> {
    let response = client.request(method, url, body, options).await?;
    Ok(parse(response.into_data())?)
}

/// Log `source` and wrap it under `operation`
fn failed(operation: &'static str, source: SdkError) -> SdkError {
    tracing::error!(operation, "{source}");
    SdkError::operation(operation, source)
}
