//! Session cookie handling and the authenticated-user request extension.

use axum::response::Redirect;
use cookie::{Cookie, SameSite};

use crate::domain::entities::{Session, User};

/// Cookie holding the identity backend's access token.
pub const SESSION_COOKIE_NAME: &str = "session_token";

/// Where a failed anti-forgery check sends the browser.
pub const INVALID_REQUEST_PATH: &str = "/auth/error?message=invalid_request";

/// The signed-in user, inserted into request extensions by
/// [`crate::web::middleware::web_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub access_token: String,
}

/// Builds the session cookie for a freshly issued session.
///
/// The cookie lives exactly as long as the access token.
pub fn session_cookie(session: &Session, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, session.access_token.clone()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(cookie::time::Duration::seconds(session.expires_in))
        .build()
}

/// A cookie that, passed to `CookieJar::remove`, deletes the session cookie.
pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE_NAME).path("/").build()
}

/// Response for a submission whose anti-forgery token did not verify.
pub fn invalid_request() -> Redirect {
    Redirect::to(INVALID_REQUEST_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn session() -> Session {
        Session {
            access_token: "access-token".to_string(),
            refresh_token: "refresh-token".to_string(),
            expires_in: 3600,
            user: User {
                id: Uuid::new_v4(),
                email: "ada@example.com".to_string(),
                email_confirmed_at: None,
            },
        }
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie(&session(), false);

        assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
        assert_eq!(cookie.value(), "access-token");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(
            cookie.max_age(),
            Some(cookie::time::Duration::seconds(3600))
        );
    }

    #[test]
    fn test_session_cookie_secure_in_production() {
        assert_eq!(session_cookie(&session(), true).secure(), Some(true));
    }
}
