//! Claim and session projections
//!
//! After sign-in, the identity subsystem keeps an opaque claim set between
//! requests and derives the visible session from it. These functions copy
//! the user ID and access token through both steps. They are pure and
//! idempotent: projecting twice yields the same result as projecting once.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::flow::AuthenticatedUser;
use crate::session::{ExternalSession, SessionUser};

/// Maximum lifetime of a signed-in session
pub const SESSION_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Claim set persisted between requests
///
/// Claims this crate does not own are kept in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    /// Access token issued at sign-in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Signed-in user ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Claims owned by the identity subsystem
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Copy the access token and ID of a freshly signed-in `user` onto `claims`
///
/// With no user (a later request on an existing session) the claims pass
/// through unchanged.
#[must_use]
pub fn project_claims(mut claims: SessionClaims, user: Option<&AuthenticatedUser>) -> SessionClaims {
    if let Some(user) = user {
        claims.access_token.clone_from(&user.access_token);
        claims.id = Some(user.id.clone());
    }
    claims
}

/// Copy the claim set's ID and access token onto `session`
#[must_use]
pub fn project_session(mut session: ExternalSession, claims: &SessionClaims) -> ExternalSession {
    session
        .user
        .get_or_insert_with(SessionUser::default)
        .id
        .clone_from(&claims.id);
    session.access_token.clone_from(&claims.access_token);
    session
}

/// The session a fresh sign-in of `user` produces
///
/// Runs both projections over an empty claim set, filling the profile
/// fields from `user`.
#[must_use]
pub fn session_for(user: &AuthenticatedUser) -> ExternalSession {
    let claims = project_claims(SessionClaims::default(), Some(user));
    let session = ExternalSession {
        user: Some(SessionUser {
            id: None,
            email: user.email.clone(),
            name: user.name.clone(),
            image: user.image.clone(),
        }),
        access_token: None,
        expires: None,
    };
    project_session(session, &claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn emily() -> AuthenticatedUser {
        AuthenticatedUser {
            id: "1".to_string(),
            email: Some("e@x.com".to_string()),
            name: Some("Emily S".to_string()),
            image: None,
            access_token: Some("abc".to_string()),
        }
    }

    #[test]
    fn test_claims_from_user() {
        let claims = project_claims(SessionClaims::default(), Some(&emily()));
        assert_eq!(claims.access_token.as_deref(), Some("abc"));
        assert_eq!(claims.id.as_deref(), Some("1"));
    }

    #[test]
    fn test_claims_without_user_unchanged() {
        let claims: SessionClaims = serde_json::from_value(json!({
            "accessToken": "abc",
            "id": "1",
            "sub": "1",
            "iat": 1700000000
        }))
        .unwrap();
        let projected = project_claims(claims.clone(), None);
        assert_eq!(projected, claims);
        assert_eq!(projected.extra["sub"], json!("1"));
    }

    #[test]
    fn test_projections_idempotent() {
        let once = project_claims(SessionClaims::default(), Some(&emily()));
        let twice = project_claims(once.clone(), Some(&emily()));
        assert_eq!(once, twice);

        let session = project_session(ExternalSession::default(), &once);
        assert_eq!(project_session(session.clone(), &once), session);
    }

    #[test]
    fn test_session_projection() {
        let claims = project_claims(SessionClaims::default(), Some(&emily()));
        let session = project_session(ExternalSession::default(), &claims);
        assert_eq!(session.access_token.as_deref(), Some("abc"));
        assert_eq!(session.user.unwrap().id.as_deref(), Some("1"));
    }

    #[test]
    fn test_session_for_user() {
        let session = session_for(&emily());
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(
            value,
            json!({
                "user": {"id": "1", "email": "e@x.com", "name": "Emily S"},
                "accessToken": "abc"
            })
        );
    }

    #[test]
    fn test_max_age() {
        assert_eq!(SESSION_MAX_AGE.as_secs(), 86_400);
    }
}
