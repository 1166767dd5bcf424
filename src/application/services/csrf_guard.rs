//! CSRF token issuance and verification.

use chrono::Utc;
use cookie::{Cookie, SameSite};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use std::fmt;
use std::time::Duration;
use subtle::ConstantTimeEq;

use crate::domain::csrf::{
    CSRF_COOKIE_NAME, CSRF_TOKEN_TTL, CookieSink, CookieSource, CsrfRejection, CsrfToken,
};

type HmacSha256 = Hmac<Sha256>;

/// Bytes of fresh entropy mixed into every token.
const ENTROPY_BYTES: usize = 32;

/// Settings injected into [`CsrfGuard`] at construction.
#[derive(Clone)]
pub struct CsrfConfig {
    /// HMAC key. Must be kept server-side.
    pub secret: String,
    /// Sets the `Secure` cookie attribute. Enabled in production.
    pub secure_cookie: bool,
    /// Cookie `Max-Age`.
    pub ttl: Duration,
}

impl CsrfConfig {
    /// Creates a configuration with the default one hour lifetime and
    /// insecure (plain HTTP) cookies.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            secure_cookie: false,
            ttl: CSRF_TOKEN_TTL,
        }
    }

    pub fn secure_cookie(mut self, secure: bool) -> Self {
        self.secure_cookie = secure;
        self
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl fmt::Debug for CsrfConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsrfConfig")
            .field("secret", &"***")
            .field("secure_cookie", &self.secure_cookie)
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Synchronized-token CSRF defense.
///
/// [`issue_token`](Self::issue_token) derives a token as
/// `hex(HMAC-SHA256(secret, entropy || issued_at_millis))` and pairs it with a
/// `csrf_token` cookie directive. [`verify_token`](Self::verify_token) accepts
/// a submission only if the submitted value equals the cookie value, compared
/// in constant time.
///
/// The guard keeps no state: the browser's cookie is the only record of an
/// issued token, and its `Max-Age` is the only expiry. A token stays valid for
/// repeated submissions until the cookie expires or is overwritten.
#[derive(Debug, Clone)]
pub struct CsrfGuard {
    config: CsrfConfig,
}

impl CsrfGuard {
    pub fn new(config: CsrfConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CsrfConfig {
        &self.config
    }

    /// Issues a fresh token and the cookie that records it.
    ///
    /// # Panics
    ///
    /// Panics if the operating system entropy source is unavailable.
    pub fn issue_token(&self) -> (CsrfToken, Cookie<'static>) {
        let mut entropy = [0u8; ENTROPY_BYTES];
        rand::rng().fill_bytes(&mut entropy);

        let issued_at = Utc::now().timestamp_millis().to_string();

        let token = self.sign(&entropy, issued_at.as_bytes());
        let cookie = self.cookie_for(&token);

        (token, cookie)
    }

    /// Issues a fresh token, writes its cookie into `sink` and returns the
    /// value to embed in the form.
    pub fn issue_into<S: CookieSink + ?Sized>(&self, sink: &mut S) -> CsrfToken {
        let (token, cookie) = self.issue_token();
        sink.set_cookie(cookie);
        token
    }

    /// Returns true only when `candidate` exactly matches the token cookie.
    ///
    /// Never fails: a missing value, missing cookie, mismatch or malformed
    /// input all yield `false`. The caller decides how to refuse the request.
    pub fn verify_token<S: CookieSource + ?Sized>(
        &self,
        candidate: Option<&str>,
        source: &S,
    ) -> bool {
        match check_token(candidate, source) {
            Ok(()) => true,
            Err(rejection) => {
                tracing::debug!(reason = %rejection, "CSRF token rejected");
                metrics::counter!("csrf_rejections_total", "reason" => rejection.code())
                    .increment(1);
                false
            }
        }
    }

    fn sign(&self, entropy: &[u8], issued_at: &[u8]) -> CsrfToken {
        let mut mac = HmacSha256::new_from_slice(self.config.secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(entropy);
        mac.update(issued_at);
        CsrfToken::new(hex::encode(mac.finalize().into_bytes()))
    }

    fn cookie_for(&self, token: &CsrfToken) -> Cookie<'static> {
        let max_age = i64::try_from(self.config.ttl.as_secs()).unwrap_or(i64::MAX);

        Cookie::build((CSRF_COOKIE_NAME, token.as_str().to_owned()))
            .http_only(true)
            .secure(self.config.secure_cookie)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(cookie::time::Duration::seconds(max_age))
            .build()
    }
}

/// Classifies a submission. The cookie store is not consulted when no
/// candidate was submitted.
fn check_token<S: CookieSource + ?Sized>(
    candidate: Option<&str>,
    source: &S,
) -> Result<(), CsrfRejection> {
    let candidate = candidate
        .filter(|c| !c.is_empty())
        .ok_or(CsrfRejection::MissingToken)?;

    let stored = source
        .cookie_value(CSRF_COOKIE_NAME)
        .ok_or(CsrfRejection::MissingCookie)?;

    constant_time_eq(candidate.as_bytes(), stored.as_bytes())
}

fn constant_time_eq(submitted: &[u8], stored: &[u8]) -> Result<(), CsrfRejection> {
    // Buffers of unequal length cannot be compared byte for byte.
    if submitted.len() != stored.len() {
        return Err(CsrfRejection::ComparisonFault);
    }

    if submitted.ct_eq(stored).into() {
        Ok(())
    } else {
        Err(CsrfRejection::Mismatch)
    }
}
