//! Dashboard home page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use chrono::Utc;

use super::page::NavView;
use crate::domain::entities::TaskStatus;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::session::CurrentUser;

/// Template for the dashboard home page.
///
/// Renders `templates/dashboard.html` with a greeting and task counts.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub csrf_token: String,
    pub nav: NavView,
    pub greeting: String,
    pub open_tasks: usize,
    pub overdue_tasks: usize,
}

/// Renders the dashboard home page.
///
/// # Endpoint
///
/// `GET /secure/dashboard`
pub async fn dashboard_handler(
    State(st): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    mut jar: CookieJar,
) -> Result<Response, AppError> {
    let profile = st.accounts.load_profile(current.user.id).await?;
    let tasks = st.tasks.list_tasks(current.user.id).await;
    let today = Utc::now().date_naive();

    let greeting = profile
        .as_ref()
        .and_then(|p| p.display_name())
        .unwrap_or_else(|| current.user.email.clone());

    let token = st.csrf.issue_into(&mut jar);
    let page = DashboardTemplate {
        csrf_token: token.into_inner(),
        nav: NavView::new(&current.user, profile.as_ref()),
        greeting,
        open_tasks: tasks
            .iter()
            .filter(|t| t.status != TaskStatus::Completed)
            .count(),
        overdue_tasks: tasks.iter().filter(|t| t.is_overdue(today)).count(),
    };

    Ok((jar, page).into_response())
}
