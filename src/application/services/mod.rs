//! Business logic services for the application layer.

pub mod account_service;
pub mod csrf_guard;
pub mod task_service;

pub use account_service::{AccountService, NewAccount};
pub use csrf_guard::{CsrfConfig, CsrfGuard};
pub use task_service::TaskService;
