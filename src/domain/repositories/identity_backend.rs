//! Port for the external identity service.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{IdentityError, Session, SignUpOutcome, User, UserUpdate};

/// Interface to the hosted identity backend.
///
/// The backend owns credential storage, password hashing and email
/// confirmation. This trait only exposes the request/response calls the
/// application needs.
///
/// # Implementations
///
/// - [`crate::infrastructure::identity::GoTrueClient`] - HTTP client for a GoTrue-compatible API
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    /// Signs in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidCredentials`] or
    /// [`IdentityError::EmailNotConfirmed`] when the backend refuses the login.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError>;

    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::UserAlreadyExists`] if the email is taken.
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, IdentityError>;

    /// Resolves the user owning an access token.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidSession`] if the token is expired or unknown.
    async fn get_user(&self, access_token: &str) -> Result<User, IdentityError>;

    /// Updates email and/or password of the user owning the token.
    ///
    /// An email change is only applied after the user confirms it.
    async fn update_user(
        &self,
        access_token: &str,
        update: UserUpdate,
    ) -> Result<User, IdentityError>;

    /// Revokes the session behind the token.
    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError>;

    /// Permanently deletes a user. Requires administrative credentials.
    async fn delete_user(&self, user_id: Uuid) -> Result<(), IdentityError>;

    /// Reports whether administrative credentials are configured, so that
    /// [`IdentityBackend::delete_user`] can succeed.
    fn can_delete_users(&self) -> bool;

    /// Checks if the backend is reachable.
    async fn health_check(&self) -> bool;
}
