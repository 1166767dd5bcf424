//! Cookie capability adapters for the CSRF guard.
//!
//! Handlers use [`axum_extra::extract::CookieJar`], which is immutable and
//! returned as part of the response. The plain [`cookie::CookieJar`] is
//! supported for background use and tests.

use axum_extra::extract::CookieJar as AxumCookieJar;
use cookie::{Cookie, CookieJar};

use crate::domain::csrf::{CookieSink, CookieSource};

impl CookieSink for AxumCookieJar {
    fn set_cookie(&mut self, cookie: Cookie<'static>) {
        *self = self.clone().add(cookie);
    }
}

impl CookieSource for AxumCookieJar {
    fn cookie_value(&self, name: &str) -> Option<String> {
        self.get(name).map(|c| c.value().to_owned())
    }
}

impl CookieSink for CookieJar {
    fn set_cookie(&mut self, cookie: Cookie<'static>) {
        self.add(cookie);
    }
}

impl CookieSource for CookieJar {
    fn cookie_value(&self, name: &str) -> Option<String> {
        self.get(name).map(|c| c.value().to_owned())
    }
}
