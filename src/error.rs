use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::domain::entities::IdentityError;

/// Error page rendered for any [`AppError`] that reaches the HTTP layer.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
struct ErrorPageTemplate {
    status: u16,
    code: &'static str,
    message: String,
}

#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    Unauthorized { message: String, details: Value },
    NotFound { message: String, details: Value },
    Conflict { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Human-readable message carried by the error.
    pub fn message(&self) -> &str {
        match self {
            AppError::Validation { message, .. }
            | AppError::Unauthorized { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Conflict { message, .. }
            | AppError::Internal { message, .. } => message,
        }
    }

    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::Unauthorized { .. } => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
            AppError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (_, code) = self.parts();
        write!(f, "{}: {}", code, self.message())
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();

        if let AppError::Internal { message, details } = &self {
            tracing::error!(%message, %details, "Request failed with internal error");
        }

        // Internal details never leave the server.
        let message = match self {
            AppError::Internal { .. } => "Something went wrong. Please try again.".to_string(),
            other => other.message().to_string(),
        };

        let page = ErrorPageTemplate {
            status: status.as_u16(),
            code,
            message,
        };

        (status, page).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

impl From<IdentityError> for AppError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::InvalidCredentials
            | IdentityError::EmailNotConfirmed
            | IdentityError::InvalidSession => {
                AppError::unauthorized("Unauthorized", json!({ "reason": e.to_string() }))
            }
            IdentityError::UserAlreadyExists => {
                AppError::conflict("User already registered", json!({}))
            }
            IdentityError::Rejected(msg) => {
                AppError::bad_request("Request rejected", json!({ "reason": msg }))
            }
            IdentityError::Unavailable(msg) => {
                AppError::internal("Identity backend unavailable", json!({ "reason": msg }))
            }
        }
    }
}

pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return AppError::conflict(
            "Unique constraint violation",
            json!({ "constraint": db.constraint() }),
        );
    }

    if matches!(e, sqlx::Error::RowNotFound) {
        return AppError::not_found("Record not found", json!({}));
    }

    AppError::internal("Database error", json!({ "reason": e.to_string() }))
}
