//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`cookies`] - Cookie capability adapters used by the CSRF guard
//! - [`identity`] - HTTP client for the hosted identity backend
//! - [`persistence`] - PostgreSQL repository implementations

pub mod cookies;
pub mod identity;
pub mod persistence;
