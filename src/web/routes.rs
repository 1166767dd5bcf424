//! Page route configuration.

use crate::state::AppState;
use crate::web::handlers::{
    account_delete, auth_error_handler, dashboard_handler, email_update, home_handler,
    login_page, login_submit, logout_handler, password_update, profile_page, profile_update,
    signup_page, signup_submit, task_create, task_delete, task_detail, task_status, task_update,
    tasks_page,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Pages behind the session cookie.
///
/// Protected via [`crate::web::middleware::web_auth`].
///
/// # Endpoints
///
/// - `GET  /secure/dashboard`             - Overview with task counts
/// - `GET  /secure/profile`               - Profile and account settings
/// - `POST /secure/profile`               - Update first and last name
/// - `POST /secure/profile/email`         - Change email address
/// - `POST /secure/profile/password`      - Change password
/// - `POST /secure/profile/delete`        - Delete the account
/// - `GET  /secure/tasks`                 - Task list with creation form
/// - `POST /secure/tasks`                 - Create a task
/// - `GET  /secure/tasks/{id}`            - Task detail with edit form
/// - `POST /secure/tasks/{id}`            - Save task edits
/// - `POST /secure/tasks/{id}/status`     - Change task status
/// - `POST /secure/tasks/{id}/delete`     - Delete a task
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/secure/dashboard", get(dashboard_handler))
        .route("/secure/profile", get(profile_page).post(profile_update))
        .route("/secure/profile/email", post(email_update))
        .route("/secure/profile/password", post(password_update))
        .route("/secure/profile/delete", post(account_delete))
        .route("/secure/tasks", get(tasks_page).post(task_create))
        .route("/secure/tasks/{id}", get(task_detail).post(task_update))
        .route("/secure/tasks/{id}/status", post(task_status))
        .route("/secure/tasks/{id}/delete", post(task_delete))
}

/// Pages reachable without a session.
///
/// # Endpoints
///
/// - `GET  /`              - Landing page
/// - `GET  /auth/login`    - Sign-in form
/// - `GET  /auth/signup`   - Registration form
/// - `GET  /auth/error`    - Generic error page for rejected requests
/// - `POST /auth/logout`   - End the session
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home_handler))
        .route("/auth/login", get(login_page))
        .route("/auth/signup", get(signup_page))
        .route("/auth/error", get(auth_error_handler))
        .route("/auth/logout", post(logout_handler))
}

/// Credential submissions, kept apart so they can carry a stricter rate
/// limit.
///
/// # Endpoints
///
/// - `POST /auth/login`    - Sign in
/// - `POST /auth/signup`   - Register
pub fn credential_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login_submit))
        .route("/auth/signup", post(signup_submit))
}
