//! Form payloads submitted by the HTML pages, with their validation rules.
//!
//! Every form carries the hidden `csrfToken` field. Field names are the
//! camelCase names used in the templates; [`FieldErrors`] is keyed the same
//! way so a template can look up the message for the input it rendered.

mod auth;
mod profile;
mod task;

use std::collections::BTreeMap;

use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

pub use auth::{LoginForm, SignupForm};
pub use profile::{DeleteAccountForm, EmailForm, PasswordForm, ProfileForm};
pub use task::{TaskForm, TaskStatusForm};

/// Key under which form-level (not field-specific) errors are stored.
pub const FORM_ERROR_KEY: &str = "_form";

/// Validation messages keyed by submitted field name.
///
/// Holds at most one message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors containing a single form-level message.
    pub fn form(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(FORM_ERROR_KEY, message);
        errors
    }

    /// Sets the message for a field, replacing any previous one.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// The form-level message, if any.
    pub fn form_error(&self) -> Option<&str> {
        self.get(FORM_ERROR_KEY)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();

        for (field, field_errors) in errors.field_errors() {
            // Later failures overwrite earlier ones.
            for error in field_errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", form_key(&field)));
                out.insert(form_key(&field), message);
            }
        }

        out
    }
}

/// Runs the form's validation rules.
///
/// Returns the form unchanged on success so handlers can keep using it.
pub fn validate_form<T: Validate>(form: T) -> Result<T, FieldErrors> {
    match form.validate() {
        Ok(()) => Ok(form),
        Err(errors) => Err(errors.into()),
    }
}

/// Converts a Rust field name to the camelCase name used in the HTML form.
fn form_key(field: &str) -> String {
    let mut key = String::with_capacity(field.len());
    let mut upper = false;

    for c in field.chars() {
        if c == '_' {
            upper = !key.is_empty();
        } else if upper {
            key.extend(c.to_uppercase());
            upper = false;
        } else {
            key.push(c);
        }
    }

    key
}

/// Builds a validation error carrying a user-facing message.
pub(crate) fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Treats a blank optional input as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_key_converts_snake_case() {
        assert_eq!(form_key("first_name"), "firstName");
        assert_eq!(form_key("current_password"), "currentPassword");
        assert_eq!(form_key("email"), "email");
        assert_eq!(form_key("firstName"), "firstName");
    }

    #[test]
    fn test_form_level_error() {
        let errors = FieldErrors::form("Invalid email or password");
        assert_eq!(errors.form_error(), Some("Invalid email or password"));
        assert_eq!(errors.get("_form"), Some("Invalid email or password"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_insert_replaces_previous_message() {
        let mut errors = FieldErrors::new();
        errors.insert("email", "Invalid email format");
        errors.insert("email", "Email is required");
        assert_eq!(errors.get("email"), Some("Email is required"));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" notes ".into())), Some("notes".into()));
        assert_eq!(non_blank(None), None);
    }
}
