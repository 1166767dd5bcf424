//! Server-rendered pages for sign-in, profile and task management.
//!
//! Uses Askama templates for rendering. Every state-changing form is guarded
//! by [`crate::application::services::CsrfGuard`].
//!
//! # Modules
//!
//! - [`forms`] - Submitted form payloads and their validation
//! - [`handlers`] - Page handlers
//! - [`middleware`] - Session cookie authentication
//! - [`routes`] - Page route configuration
//! - [`session`] - Session cookie helpers

pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod session;
