//! Domain layer containing entities, ports and the anti-forgery token model.
//!
//! # Architecture
//!
//! - [`entities`] - Users, sessions, profiles and tasks
//! - [`repositories`] - Data access and identity backend trait definitions
//! - [`csrf`] - CSRF token type and cookie capabilities
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Traits define contracts implemented by the infrastructure layer
//! - Business logic lives in services (see [`crate::application::services`])

pub mod csrf;
pub mod entities;
pub mod repositories;
