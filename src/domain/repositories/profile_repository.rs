//! Repository trait for user profiles.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{NewProfile, Profile};
use crate::error::AppError;

/// Repository interface for profile rows.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgProfileRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Finds the profile of a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<Profile>, AppError>;

    /// Inserts the profile created at sign-up.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the user already has a profile.
    async fn create(&self, profile: NewProfile) -> Result<Profile, AppError>;

    /// Replaces first and last name and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the profile does not exist.
    async fn update_names(
        &self,
        user_id: Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<Profile, AppError>;

    /// Deletes the profile of a user. Missing profiles are not an error.
    async fn delete(&self, user_id: Uuid) -> Result<(), AppError>;

    /// Checks database connectivity.
    async fn health_check(&self) -> bool;
}
