//! Authentication payloads

use serde::{Deserialize, Serialize};

use super::schema::{Checker, Schema};
use super::user::{GENDERS, Gender};

/// Token lifetime requested when the caller does not choose one
pub const DEFAULT_EXPIRES_IN_MINS: u32 = 30;

fn default_expires_in_mins() -> u32 {
    DEFAULT_EXPIRES_IN_MINS
}

/// Username and password accepted by credential sign-in
///
/// Keys other than `username` and `password` are ignored when parsing and
/// never sent to the backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInCredentials {
    /// Account username
    pub username: String,
    /// Account password
    pub password: String,
}

impl std::fmt::Debug for SignInCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignInCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl Schema for SignInCredentials {
    fn check(v: &mut Checker<'_>) {
        v.string_min("username", 1, "Username is required");
        v.string_min("password", 1, "Password is required");
    }
}

/// Username/password login request with a token lifetime
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    /// Account username
    pub username: String,
    /// Account password
    pub password: String,
    /// Requested access token lifetime
    #[serde(default = "default_expires_in_mins")]
    pub expires_in_mins: u32,
}

impl LoginCredentials {
    /// Credentials with the default token lifetime
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            expires_in_mins: DEFAULT_EXPIRES_IN_MINS,
        }
    }
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("has_password", &!self.password.is_empty())
            .field("expires_in_mins", &self.expires_in_mins)
            .finish()
    }
}

impl Schema for LoginCredentials {
    fn check(v: &mut Checker<'_>) {
        v.string_min("username", 1, "Username is required");
        v.string_min("password", 1, "Password is required");
        v.optional_unsigned32("expiresInMins");
    }
}

/// Backend response to a successful login, refresh or registration
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Numeric user ID
    pub id: u64,
    /// Username
    pub username: String,
    /// Email address
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Gender
    pub gender: Gender,
    /// Avatar URL
    pub image: String,
    /// Bearer token for API calls
    pub access_token: String,
    /// Token used to obtain a new access token
    pub refresh_token: String,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("gender", &self.gender)
            .field("image", &self.image)
            .finish_non_exhaustive()
    }
}

impl Schema for LoginResponse {
    fn check(v: &mut Checker<'_>) {
        v.unsigned("id");
        v.string("username");
        v.email("email", "Invalid email");
        v.string("firstName");
        v.string("lastName");
        v.one_of("gender", &GENDERS);
        v.url("image");
        v.string("accessToken");
        v.string("refreshToken");
    }
}

/// Token refresh request
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    /// Refresh token from a previous login
    pub refresh_token: String,
    /// Requested access token lifetime
    #[serde(default = "default_expires_in_mins")]
    pub expires_in_mins: u32,
}

impl RefreshTokenRequest {
    /// Refresh with the default token lifetime
    pub fn new(refresh_token: impl Into<String>) -> Self {
        Self {
            refresh_token: refresh_token.into(),
            expires_in_mins: DEFAULT_EXPIRES_IN_MINS,
        }
    }
}

impl std::fmt::Debug for RefreshTokenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshTokenRequest")
            .field("expires_in_mins", &self.expires_in_mins)
            .finish_non_exhaustive()
    }
}

impl Schema for RefreshTokenRequest {
    fn check(v: &mut Checker<'_>) {
        v.string("refreshToken");
        v.optional_unsigned32("expiresInMins");
    }
}

/// Account registration request
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    /// Desired username (3+ characters)
    pub username: String,
    /// Email address
    pub email: String,
    /// Password (6+ characters)
    pub password: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Age in years (18+)
    pub age: u32,
    /// Gender
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

impl std::fmt::Debug for RegisterData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterData")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("age", &self.age)
            .field("gender", &self.gender)
            .finish_non_exhaustive()
    }
}

impl Schema for RegisterData {
    fn check(v: &mut Checker<'_>) {
        v.string_min("username", 3, "Username must be at least 3 characters");
        v.email("email", "Valid email is required");
        v.string_min("password", 6, "Password must be at least 6 characters");
        v.string_min("firstName", 1, "First name is required");
        v.string_min("lastName", 1, "Last name is required");
        v.unsigned32_min("age", 18, "Must be at least 18 years old");
        v.optional_one_of("gender", &GENDERS);
    }
}
