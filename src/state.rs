//! Shared application state injected into handlers and middleware.

use std::sync::Arc;

use crate::application::services::{AccountService, CsrfGuard, TaskService};

#[derive(Clone)]
pub struct AppState {
    pub csrf: Arc<CsrfGuard>,
    pub accounts: Arc<AccountService>,
    pub tasks: Arc<TaskService>,
    /// Marks session cookies `Secure`. Enabled in production.
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(
        csrf: Arc<CsrfGuard>,
        accounts: Arc<AccountService>,
        tasks: Arc<TaskService>,
        secure_cookies: bool,
    ) -> Self {
        Self {
            csrf,
            accounts,
            tasks,
            secure_cookies,
        }
    }
}
