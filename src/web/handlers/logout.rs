//! Sign-out handler.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::state::AppState;
use crate::web::session::{SESSION_COOKIE_NAME, expired_session_cookie, invalid_request};

/// Body of the navigation bar's sign-out form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutForm {
    #[serde(default)]
    pub csrf_token: Option<String>,
}

/// Ends the session.
///
/// # Endpoint
///
/// `POST /auth/logout`
///
/// The backend session is revoked when possible; the session cookie is
/// cleared in every case once the anti-forgery token verifies.
pub async fn logout_handler(
    State(st): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LogoutForm>,
) -> Response {
    if !st.csrf.verify_token(form.csrf_token.as_deref(), &jar) {
        return invalid_request().into_response();
    }

    if let Some(token) = jar.get(SESSION_COOKIE_NAME).map(|c| c.value().to_owned()) {
        st.accounts.logout(&token).await;
    }

    (
        jar.remove(expired_session_cookie()),
        Redirect::to("/auth/login?notice=signed_out"),
    )
        .into_response()
}
