//! Anti-forgery token model and the cookie capabilities it relies on.
//!
//! A [`CsrfToken`] is stored twice: in the http-only cookie
//! [`CSRF_COOKIE_NAME`] and as the hidden form field [`CSRF_FORM_FIELD`].
//! A submission is honored only when both copies are byte-identical.
//!
//! Cookie access is expressed through [`CookieSink`] and [`CookieSource`] so
//! the guard stays independent of any particular HTTP framework.

use cookie::Cookie;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Name of the cookie holding the server-issued token.
pub const CSRF_COOKIE_NAME: &str = "csrf_token";

/// Name of the hidden form field echoing the token back.
pub const CSRF_FORM_FIELD: &str = "csrfToken";

/// Lifetime of an issued token, enforced through the cookie's `Max-Age`.
pub const CSRF_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Length of a token: hex-encoded HMAC-SHA256 digest.
pub const CSRF_TOKEN_LEN: usize = 64;

/// An issued anti-forgery token (64 lowercase hex characters).
#[derive(Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub(crate) fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CsrfToken(..)")
    }
}

impl AsRef<str> for CsrfToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Why a submitted token was refused.
///
/// Only used for logging and metrics. Callers of the guard see a plain
/// `false` so the reason never reaches the client.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CsrfRejection {
    #[error("no token submitted")]
    MissingToken,
    #[error("no token cookie present")]
    MissingCookie,
    #[error("submitted token does not match cookie")]
    Mismatch,
    #[error("token could not be compared")]
    ComparisonFault,
}

impl CsrfRejection {
    /// Stable label for metrics.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::MissingCookie => "missing_cookie",
            Self::Mismatch => "mismatch",
            Self::ComparisonFault => "comparison_fault",
        }
    }
}

/// Somewhere an outgoing cookie can be written.
pub trait CookieSink {
    fn set_cookie(&mut self, cookie: Cookie<'static>);
}

/// Somewhere an incoming cookie value can be read.
pub trait CookieSource {
    fn cookie_value(&self, name: &str) -> Option<String>;
}

impl<T: CookieSink + ?Sized> CookieSink for &mut T {
    fn set_cookie(&mut self, cookie: Cookie<'static>) {
        (**self).set_cookie(cookie);
    }
}

impl<T: CookieSource + ?Sized> CookieSource for &T {
    fn cookie_value(&self, name: &str) -> Option<String> {
        (**self).cookie_value(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_does_not_leak_value() {
        let token = CsrfToken::new("a".repeat(CSRF_TOKEN_LEN));
        assert_eq!(format!("{:?}", token), "CsrfToken(..)");
        assert_eq!(token.to_string().len(), CSRF_TOKEN_LEN);
    }

    #[test]
    fn test_rejection_codes_are_distinct() {
        let codes = [
            CsrfRejection::MissingToken.code(),
            CsrfRejection::MissingCookie.code(),
            CsrfRejection::Mismatch.code(),
            CsrfRejection::ComparisonFault.code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
