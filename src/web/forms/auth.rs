use serde::Deserialize;
use validator::{Validate, ValidateEmail, ValidationError};

use super::invalid;

pub(crate) const PASSWORD_MIN_LEN: usize = 6;
pub(crate) const PASSWORD_MAX_LEN: usize = 100;

/// Credentials posted by the login page.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    #[serde(default)]
    #[validate(custom(function = "validate_email_address"))]
    pub email: String,

    #[serde(default)]
    #[validate(custom(function = "validate_password"))]
    pub password: String,

    #[serde(default)]
    pub csrf_token: Option<String>,
}

/// Registration data posted by the signup page.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    #[serde(default)]
    #[validate(custom(function = "validate_email_address"))]
    pub email: String,

    #[serde(default)]
    #[validate(custom(function = "validate_password"))]
    pub password: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    #[serde(default)]
    pub csrf_token: Option<String>,
}

pub(crate) fn validate_email_address(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(invalid("required", "Email is required"));
    }
    if !email.validate_email() {
        return Err(invalid("email", "Invalid email format"));
    }
    Ok(())
}

pub(crate) fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if len < PASSWORD_MIN_LEN {
        return Err(invalid(
            "length",
            "Password must be at least 6 characters",
        ));
    }
    if len > PASSWORD_MAX_LEN {
        return Err(invalid("length", "Password is too long"));
    }
    Ok(())
}
