//! Account lifecycle service: sign-in, sign-up, profile and credential changes.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{
    IdentityError, NewProfile, Profile, Session, SignUpOutcome, User, UserUpdate,
};
use crate::domain::repositories::{IdentityBackend, ProfileRepository, TaskRepository};
use crate::error::AppError;

/// Shown when the backend rejects the email/password pair.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";
/// Shown when the account exists but its email was never confirmed.
pub const UNCONFIRMED_EMAIL_MESSAGE: &str = "Please verify your email address";
/// Shown for any other sign-in failure.
pub const AUTH_FAILED_MESSAGE: &str = "Authentication failed. Please try again.";
/// Shown when a re-authentication check fails during a credential change.
pub const WRONG_PASSWORD_MESSAGE: &str = "Current password is incorrect";

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Service coordinating the identity backend with the profile and task stores.
///
/// Identity operations are delegated to [`IdentityBackend`]; this service only
/// adds the user-facing error mapping and the bookkeeping rows that belong to
/// an account.
pub struct AccountService {
    identity: Arc<dyn IdentityBackend>,
    profiles: Arc<dyn ProfileRepository>,
    tasks: Arc<dyn TaskRepository>,
}

impl AccountService {
    pub fn new(
        identity: Arc<dyn IdentityBackend>,
        profiles: Arc<dyn ProfileRepository>,
        tasks: Arc<dyn TaskRepository>,
    ) -> Self {
        Self {
            identity,
            profiles,
            tasks,
        }
    }

    /// Signs a user in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] whose message is safe to show on the
    /// login form:
    /// - [`INVALID_CREDENTIALS_MESSAGE`] for a wrong email/password pair
    /// - [`UNCONFIRMED_EMAIL_MESSAGE`] if the email is not yet confirmed
    /// - [`AUTH_FAILED_MESSAGE`] for anything else
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AppError> {
        match self.identity.sign_in(email, password).await {
            Ok(session) => {
                tracing::info!(user_id = %session.user.id, "User signed in");
                Ok(session)
            }
            Err(e) => {
                let (reason, message) = match &e {
                    IdentityError::InvalidCredentials => {
                        ("invalid_credentials", INVALID_CREDENTIALS_MESSAGE)
                    }
                    IdentityError::EmailNotConfirmed => {
                        ("email_not_confirmed", UNCONFIRMED_EMAIL_MESSAGE)
                    }
                    _ => ("backend_error", AUTH_FAILED_MESSAGE),
                };

                tracing::warn!(error = %e, reason, "Login failed");
                metrics::counter!("login_failures_total", "reason" => reason).increment(1);

                Err(AppError::unauthorized(
                    message,
                    json!({ "reason": e.to_string() }),
                ))
            }
        }
    }

    /// Creates an identity and its profile row.
    ///
    /// The returned outcome carries a session only when the backend does not
    /// require email confirmation.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`IdentityError`] if sign-up fails, or the
    /// repository error if the profile row cannot be created.
    pub async fn signup(&self, account: NewAccount) -> Result<SignUpOutcome, AppError> {
        let outcome = self
            .identity
            .sign_up(&account.email, &account.password)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Sign-up failed"))?;

        self.profiles
            .create(NewProfile {
                id: outcome.user.id,
                first_name: account.first_name,
                last_name: account.last_name,
            })
            .await
            .inspect_err(|e| {
                tracing::error!(user_id = %outcome.user.id, error = %e, "Error creating profile")
            })?;

        tracing::info!(user_id = %outcome.user.id, "Account created");
        Ok(outcome)
    }

    /// Resolves the user behind a session access token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown or expired.
    pub async fn current_user(&self, access_token: &str) -> Result<User, AppError> {
        Ok(self.identity.get_user(access_token).await?)
    }

    /// Loads the profile for a user, if one exists.
    pub async fn load_profile(&self, user_id: Uuid) -> Result<Option<Profile>, AppError> {
        self.profiles.find_by_id(user_id).await
    }

    /// Replaces the user's first and last name.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<Profile, AppError> {
        self.profiles
            .update_names(user_id, first_name, last_name)
            .await
    }

    /// Requests an email change.
    ///
    /// The backend sends a confirmation link; the address changes only once
    /// it is followed.
    pub async fn update_email(&self, access_token: &str, email: &str) -> Result<(), AppError> {
        self.identity
            .update_user(
                access_token,
                UserUpdate {
                    email: Some(email.to_string()),
                    password: None,
                },
            )
            .await?;

        tracing::info!("Email change requested");
        Ok(())
    }

    /// Changes the password after re-verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] with [`WRONG_PASSWORD_MESSAGE`] if
    /// `current_password` does not sign the user in.
    pub async fn update_password(
        &self,
        access_token: &str,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        self.reauthenticate(user, current_password).await?;

        self.identity
            .update_user(
                access_token,
                UserUpdate {
                    email: None,
                    password: Some(new_password.to_string()),
                },
            )
            .await?;

        tracing::info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    /// Deletes the account and everything stored for it.
    ///
    /// Order: verify password, remove tasks and profile, remove the identity,
    /// then end the session. A failed sign-out after deletion is only logged.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] without touching any data when the
    /// identity backend has no administrative credentials.
    pub async fn delete_account(
        &self,
        access_token: &str,
        user: &User,
        password: &str,
    ) -> Result<(), AppError> {
        self.reauthenticate(user, password).await?;

        if !self.identity.can_delete_users() {
            tracing::error!(user_id = %user.id, "Account deletion requires the service role key");
            return Err(AppError::internal(
                "Account deletion is not configured",
                json!({ "reason": "missing service role key" }),
            ));
        }

        let removed = self.tasks.delete_all_for_user(user.id).await?;
        self.profiles.delete(user.id).await?;
        self.identity.delete_user(user.id).await?;

        if let Err(e) = self.identity.sign_out(access_token).await {
            tracing::debug!(error = %e, "Sign-out after account deletion failed");
        }

        tracing::info!(user_id = %user.id, tasks_removed = removed, "Account deleted");
        Ok(())
    }

    /// Ends the session at the backend.
    ///
    /// Failures are logged and swallowed: the caller clears local cookies
    /// regardless.
    pub async fn logout(&self, access_token: &str) {
        if let Err(e) = self.identity.sign_out(access_token).await {
            tracing::warn!(error = %e, "Backend sign-out failed");
        }
    }

    /// Reports whether the identity backend is reachable.
    pub async fn identity_healthy(&self) -> bool {
        self.identity.health_check().await
    }

    /// Reports whether the database is reachable.
    pub async fn database_healthy(&self) -> bool {
        self.profiles.health_check().await
    }

    async fn reauthenticate(&self, user: &User, password: &str) -> Result<(), AppError> {
        match self.identity.sign_in(&user.email, password).await {
            Ok(_) => Ok(()),
            Err(IdentityError::InvalidCredentials) => Err(AppError::bad_request(
                WRONG_PASSWORD_MESSAGE,
                json!({ "field": "currentPassword" }),
            )),
            Err(e) => Err(e.into()),
        }
    }
}
