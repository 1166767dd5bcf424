//! Authentication error page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::Query;
use serde::Deserialize;

#[derive(Template, WebTemplate)]
#[template(path = "auth_error.html")]
pub struct AuthErrorTemplate {
    pub message: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuthErrorQuery {
    pub message: Option<String>,
}

/// Maps the `message` code to the text shown to the user.
pub fn auth_error_text(code: Option<&str>) -> &'static str {
    match code {
        Some("invalid_request") => "Invalid request. Please try again from the login page.",
        Some("invalid_credentials") => "Invalid email or password. Please try again.",
        _ => "Sorry, something went wrong with authentication.",
    }
}

/// Renders the error page.
///
/// # Endpoint
///
/// `GET /auth/error?message=<code>`
pub async fn auth_error_handler(Query(query): Query<AuthErrorQuery>) -> AuthErrorTemplate {
    AuthErrorTemplate {
        message: auth_error_text(query.message.as_deref()),
    }
}
