//! HTTP middleware for request processing and protection.
//!
//! Provides rate limiting, response hardening and observability middleware.
//! Session authentication for pages lives in [`crate::web::middleware`].

pub mod rate_limit;
pub mod security_headers;
pub mod tracing;
