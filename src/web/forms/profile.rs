use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::auth::{PASSWORD_MIN_LEN, validate_email_address};
use super::invalid;

/// Text the user must type to confirm account deletion.
pub const DELETE_CONFIRMATION: &str = "DELETE MY ACCOUNT";

/// Name change posted by the profile page.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    #[serde(default)]
    pub csrf_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmailForm {
    #[serde(default)]
    #[validate(custom(function = "validate_email_address"))]
    pub email: String,

    #[serde(default)]
    pub csrf_token: Option<String>,
}

/// Password change. The current password is re-checked against the backend.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PasswordForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Both current and new password are required"))]
    pub current_password: String,

    #[serde(default)]
    #[validate(custom(function = "validate_new_password"))]
    pub new_password: String,

    #[serde(default)]
    pub csrf_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[serde(default)]
    #[validate(custom(function = "validate_confirmation"))]
    pub confirmation: String,

    #[serde(default)]
    pub csrf_token: Option<String>,
}

fn validate_new_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(invalid(
            "required",
            "Both current and new password are required",
        ));
    }
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(invalid(
            "length",
            "New password must be at least 6 characters long",
        ));
    }
    Ok(())
}

fn validate_confirmation(text: &str) -> Result<(), ValidationError> {
    if text != DELETE_CONFIRMATION {
        return Err(invalid(
            "confirmation",
            "Please type exactly \"DELETE MY ACCOUNT\" (case sensitive)",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::forms::validate_form;

    #[test]
    fn test_password_form_rules() {
        let form = PasswordForm {
            current_password: "secret1".into(),
            new_password: "abc".into(),
            csrf_token: None,
        };
        let errors = validate_form(form).unwrap_err();
        assert_eq!(
            errors.get("newPassword"),
            Some("New password must be at least 6 characters long")
        );

        let form = PasswordForm {
            current_password: String::new(),
            new_password: "newsecret".into(),
            csrf_token: None,
        };
        let errors = validate_form(form).unwrap_err();
        assert!(errors.get("currentPassword").is_some());
    }

    #[test]
    fn test_delete_confirmation_is_case_sensitive() {
        let form = DeleteAccountForm {
            password: "secret1".into(),
            confirmation: "delete my account".into(),
            csrf_token: None,
        };
        let errors = validate_form(form).unwrap_err();
        assert!(errors.get("confirmation").is_some());

        let form = DeleteAccountForm {
            password: "secret1".into(),
            confirmation: DELETE_CONFIRMATION.into(),
            csrf_token: None,
        };
        assert!(validate_form(form).is_ok());
    }

    #[test]
    fn test_email_form() {
        let form = EmailForm {
            email: "new@example.com".into(),
            csrf_token: None,
        };
        assert!(validate_form(form).is_ok());
    }
}
