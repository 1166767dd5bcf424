//! HTML page handlers.
//!
//! GET handlers that render a form issue a fresh anti-forgery token into the
//! response cookies; POST handlers verify it before touching any service.

mod auth_error;
mod dashboard;
mod home;
mod login;
mod logout;
mod page;
mod profile;
mod signup;
mod tasks;

pub use auth_error::auth_error_handler;
pub use dashboard::dashboard_handler;
pub use home::home_handler;
pub use login::{login_page, login_submit};
pub use logout::logout_handler;
pub use page::{NavView, SelectOption};
pub use profile::{account_delete, email_update, password_update, profile_page, profile_update};
pub use signup::{signup_page, signup_submit};
pub use tasks::{
    TaskView, task_create, task_delete, task_detail, task_status, task_update, tasks_page,
};
