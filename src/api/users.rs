//! User endpoints

use serde_json::Value;

use super::{call, failed};
use crate::client::{HttpClient, Method, RequestOptions};
use crate::error::Result;
use crate::types::{User, UserId, UsersResponse};

/// Page size used when the caller does not pick one
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// User listing, search, lookup and update
#[derive(Debug, Clone)]
pub struct UsersApi {
    client: HttpClient,
}

impl UsersApi {
    /// Call the user endpoints through `client`
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// One page of users
    ///
    /// `limit` defaults to [`DEFAULT_PAGE_SIZE`], `skip` to 0.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Operation`](crate::SdkError::Operation)
    /// ("Failed to fetch users") if the call or validation fails.
    pub async fn fetch_users(&self, limit: Option<u32>, skip: Option<u32>) -> Result<UsersResponse> {
        let options = RequestOptions::builder()
            .query(vec![
                ("limit".to_string(), limit.unwrap_or(DEFAULT_PAGE_SIZE).to_string()),
                ("skip".to_string(), skip.unwrap_or(0).to_string()),
            ])
            .build();
        call(&self.client, Method::GET, "/users", None, Some(options))
            .await
            .map_err(|e| failed("Failed to fetch users", e))
    }

    /// Users matching a free-text query
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Operation`](crate::SdkError::Operation)
    /// ("Failed to search users") if the call or validation fails.
    pub async fn search_users(&self, query: &str, limit: Option<u32>) -> Result<UsersResponse> {
        let options = RequestOptions::builder()
            .query(vec![
                ("q".to_string(), query.to_string()),
                ("limit".to_string(), limit.unwrap_or(DEFAULT_PAGE_SIZE).to_string()),
            ])
            .build();
        call(&self.client, Method::GET, "/users/search", None, Some(options))
            .await
            .map_err(|e| failed("Failed to search users", e))
    }

    /// A single user
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Operation`](crate::SdkError::Operation)
    /// ("Failed to fetch user") if the call or validation fails.
    pub async fn get_user(&self, id: impl Into<UserId>) -> Result<User> {
        let id: UserId = id.into();
        let url = format!("/users/{id}");
        call(&self.client, Method::GET, &url, None, None)
            .await
            .map_err(|e| failed("Failed to fetch user", e))
    }

    /// The user the session token belongs to
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Operation`](crate::SdkError::Operation)
    /// ("Failed to fetch current user") if the call or validation fails.
    pub async fn current_user(&self) -> Result<User> {
        call(&self.client, Method::GET, "/auth/me", None, None)
            .await
            .map_err(|e| failed("Failed to fetch current user", e))
    }

    /// Apply a partial update and return the updated user
    ///
    /// `patch` holds any subset of the user's fields in backend (camelCase)
    /// form.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Operation`](crate::SdkError::Operation)
    /// ("Failed to update user") if the call or validation fails.
    pub async fn update_user(&self, id: impl Into<UserId>, patch: Value) -> Result<User> {
        let id: UserId = id.into();
        let url = format!("/users/{id}");
        call(&self.client, Method::PUT, &url, Some(patch), None)
            .await
            .map_err(|e| failed("Failed to update user", e))
    }
}
