//! Domain types and their schemas
//!
//! Every payload the SDK accepts from the backend or from a caller is
//! validated with [`parse`] before use. Validation is all-or-nothing and
//! reports every violation.

// Module declarations
pub mod auth;
pub mod form;
pub mod identifiers;
pub mod schema;
pub mod user;

pub use auth::{
    DEFAULT_EXPIRES_IN_MINS, LoginCredentials, LoginResponse, RefreshTokenRequest, RegisterData,
    SignInCredentials,
};
pub use form::{DateRange, ProfileForm, Role};
pub use identifiers::{SessionToken, UserId};
pub use schema::{Checker, Schema, is_email, parse};
pub use user::{Address, Bank, Company, Coordinates, Crypto, Gender, Hair, User, UsersResponse};
