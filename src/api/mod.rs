//! JSON endpoints and the HTTP middleware shared by every route.
//!
//! # Modules
//!
//! - [`dto`] - Response payloads
//! - [`handlers`] - JSON request handlers
//! - [`middleware`] - Rate limiting, security headers and tracing

pub mod dto;
pub mod handlers;
pub mod middleware;
