//! Landing page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum_extra::extract::CookieJar;

use crate::web::session::SESSION_COOKIE_NAME;

/// Template for the landing page.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Whether a session cookie is present; only chooses which links to show.
    pub signed_in: bool,
}

/// Renders the landing page.
///
/// # Endpoint
///
/// `GET /`
pub async fn home_handler(jar: CookieJar) -> HomeTemplate {
    HomeTemplate {
        signed_in: jar.get(SESSION_COOKIE_NAME).is_some(),
    }
}
