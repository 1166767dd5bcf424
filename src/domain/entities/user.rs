//! Identity records owned by the external auth backend.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

/// An authenticated user as reported by the identity backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub email_confirmed_at: Option<DateTime<Utc>>,
}

/// A live session issued after a successful sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime of `access_token` in seconds.
    pub expires_in: i64,
    pub user: User,
}

/// Result of a sign-up call.
///
/// `session` is `None` when the backend requires email confirmation before
/// the first sign-in.
#[derive(Debug, Clone)]
pub struct SignUpOutcome {
    pub user: User,
    pub session: Option<Session>,
}

/// Partial update of the user's credentials.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Failures reported by the identity backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("invalid login credentials")]
    InvalidCredentials,
    #[error("email not confirmed")]
    EmailNotConfirmed,
    #[error("user already registered")]
    UserAlreadyExists,
    #[error("session is missing or expired")]
    InvalidSession,
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("identity backend unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_deserializes_without_optional_fields() {
        let user: User =
            serde_json::from_str(r#"{"id":"6f1c2a7e-3c55-4d0e-9a4e-2b1f0e5d9c11"}"#).unwrap();

        assert_eq!(user.email, "");
        assert!(user.email_confirmed_at.is_none());
    }

    #[test]
    fn test_session_deserializes() {
        let session: Session = serde_json::from_str(
            r#"{
                "access_token": "at",
                "refresh_token": "rt",
                "expires_in": 3600,
                "token_type": "bearer",
                "user": {"id": "6f1c2a7e-3c55-4d0e-9a4e-2b1f0e5d9c11", "email": "a@b.co"}
            }"#,
        )
        .unwrap();

        assert_eq!(session.access_token, "at");
        assert_eq!(session.expires_in, 3600);
        assert_eq!(session.user.email, "a@b.co");
    }

    #[test]
    fn test_user_update_default_is_empty() {
        let update = UserUpdate::default();
        assert!(update.email.is_none());
        assert!(update.password.is_none());
    }
}
