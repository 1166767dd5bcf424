//! Application layer services implementing business logic.
//!
//! Services consume the repository and backend traits from
//! [`crate::domain::repositories`] and expose the operations HTTP handlers call.
//!
//! # Available Services
//!
//! - [`services::csrf_guard::CsrfGuard`] - Anti-forgery token issuance and verification
//! - [`services::account_service::AccountService`] - Sign-in, sign-up and account changes
//! - [`services::task_service::TaskService`] - Per-user task list

pub mod services;
