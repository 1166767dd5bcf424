//! Cookie-based authentication middleware for the `/secure` pages.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::state::AppState;
use crate::web::session::{CurrentUser, SESSION_COOKIE_NAME, expired_session_cookie};

/// Authenticates page requests using the session cookie.
///
/// # Cookie Format
///
/// ```text
/// Cookie: session_token=<access token>
/// ```
///
/// # Authentication Flow
///
/// 1. Extract the `session_token` cookie from the request
/// 2. Resolve the user through [`crate::application::services::AccountService::current_user`]
/// 3. On success, insert [`CurrentUser`] into request extensions and continue
/// 4. On failure or missing cookie, redirect to `/auth/login`
///
/// Sessions are not refreshed: once the access token expires, the user signs
/// in again. A rejected cookie is removed along with the redirect.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::web::middleware::web_auth;
///
/// let protected = Router::new()
///     .route("/dashboard", get(dashboard_handler))
///     .layer(middleware::from_fn_with_state(state.clone(), web_auth::layer));
/// ```
pub async fn layer(State(st): State<AppState>, mut req: Request, next: Next) -> Response {
    let jar = CookieJar::from_headers(req.headers());

    let Some(token) = jar
        .get(SESSION_COOKIE_NAME)
        .map(|c| c.value().to_owned())
        .filter(|t| !t.is_empty())
    else {
        return Redirect::to("/auth/login").into_response();
    };

    match st.accounts.current_user(&token).await {
        Ok(user) => {
            req.extensions_mut().insert(CurrentUser {
                user,
                access_token: token,
            });
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "Session rejected");
            (
                jar.remove(expired_session_cookie()),
                Redirect::to("/auth/login"),
            )
                .into_response()
        }
    }
}
