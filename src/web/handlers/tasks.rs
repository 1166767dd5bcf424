//! Task list, detail and task mutations.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Extension, Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::page::{NavView, SelectOption, priority_options, status_options};
use crate::domain::entities::Task;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::forms::{FieldErrors, TaskForm, TaskStatusForm};
use crate::web::session::{CurrentUser, invalid_request};

/// A task prepared for display.
#[derive(Debug, Clone)]
pub struct TaskView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: &'static str,
    pub status_label: &'static str,
    pub priority: &'static str,
    pub priority_label: &'static str,
    /// `YYYY-MM-DD`, empty when unset.
    pub due_date: String,
    pub overdue: bool,
    pub created_at: String,
}

impl TaskView {
    pub fn new(task: &Task, today: NaiveDate) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status.as_str(),
            status_label: task.status.label(),
            priority: task.priority.as_str(),
            priority_label: task.priority.label(),
            due_date: task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            overdue: task.is_overdue(today),
            created_at: task.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Values to pre-fill the create/edit form with.
#[derive(Debug, Clone, Default)]
pub struct TaskFormView {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub statuses: Vec<SelectOption>,
    pub priorities: Vec<SelectOption>,
}

impl TaskFormView {
    fn empty() -> Self {
        Self {
            statuses: status_options(None),
            priorities: priority_options(None),
            ..Default::default()
        }
    }

    fn from_form(form: &TaskForm) -> Self {
        Self {
            title: form.title.clone(),
            description: form.description.clone().unwrap_or_default(),
            due_date: form.due_date.clone(),
            statuses: status_options(form.status.parse().ok()),
            priorities: priority_options(form.priority.parse().ok()),
        }
    }

    fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            due_date: task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            statuses: status_options(Some(task.status)),
            priorities: priority_options(Some(task.priority)),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "tasks.html")]
pub struct TasksTemplate {
    pub csrf_token: String,
    pub nav: NavView,
    pub tasks: Vec<TaskView>,
    pub form: TaskFormView,
    pub errors: FieldErrors,
}

#[derive(Template, WebTemplate)]
#[template(path = "task_detail.html")]
pub struct TaskDetailTemplate {
    pub csrf_token: String,
    pub nav: NavView,
    pub task: TaskView,
    pub form: TaskFormView,
    pub errors: FieldErrors,
}

/// Body of the delete button form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteForm {
    #[serde(default)]
    pub csrf_token: Option<String>,
}

async fn nav_for(st: &AppState, current: &CurrentUser) -> Result<NavView, AppError> {
    let profile = st.accounts.load_profile(current.user.id).await?;
    Ok(NavView::new(&current.user, profile.as_ref()))
}

async fn render_list(
    st: &AppState,
    mut jar: CookieJar,
    current: &CurrentUser,
    form: TaskFormView,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    let nav = nav_for(st, current).await?;
    let today = Utc::now().date_naive();
    let tasks = st
        .tasks
        .list_tasks(current.user.id)
        .await
        .iter()
        .map(|t| TaskView::new(t, today))
        .collect();

    let token = st.csrf.issue_into(&mut jar);
    let page = TasksTemplate {
        csrf_token: token.into_inner(),
        nav,
        tasks,
        form,
        errors,
    };

    Ok((jar, page).into_response())
}

async fn render_detail(
    st: &AppState,
    mut jar: CookieJar,
    current: &CurrentUser,
    task: &Task,
    form: TaskFormView,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    let nav = nav_for(st, current).await?;
    let token = st.csrf.issue_into(&mut jar);
    let page = TaskDetailTemplate {
        csrf_token: token.into_inner(),
        nav,
        task: TaskView::new(task, Utc::now().date_naive()),
        form,
        errors,
    };

    Ok((jar, page).into_response())
}

async fn load_task(st: &AppState, user_id: Uuid, task_id: Uuid) -> Result<Task, AppError> {
    st.tasks
        .get_task(user_id, task_id)
        .await
        .ok_or_else(|| AppError::not_found("Task not found", json!({ "id": task_id })))
}

/// Renders the task list with the creation form.
///
/// # Endpoint
///
/// `GET /secure/tasks`
pub async fn tasks_page(
    State(st): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    render_list(&st, jar, &current, TaskFormView::empty(), FieldErrors::new()).await
}

/// Creates a task.
///
/// # Endpoint
///
/// `POST /secure/tasks`
pub async fn task_create(
    State(st): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    jar: CookieJar,
    Form(form): Form<TaskForm>,
) -> Result<Response, AppError> {
    if !st.csrf.verify_token(form.csrf_token.as_deref(), &jar) {
        return Ok(invalid_request().into_response());
    }

    let view = TaskFormView::from_form(&form);
    let new_task = match form.into_new_task() {
        Ok(task) => task,
        Err(errors) => return render_list(&st, jar, &current, view, errors).await,
    };

    match st.tasks.create_task(current.user.id, new_task).await {
        Ok(_) => Ok(Redirect::to("/secure/tasks").into_response()),
        Err(e) => {
            tracing::error!(error = %e, "Error creating task");
            let errors = FieldErrors::form("Failed to create task");
            render_list(&st, jar, &current, view, errors).await
        }
    }
}

/// Renders one task with its edit form.
///
/// # Endpoint
///
/// `GET /secure/tasks/{id}`
pub async fn task_detail(
    State(st): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(task_id): Path<Uuid>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let task = load_task(&st, current.user.id, task_id).await?;
    let form = TaskFormView::from_task(&task);
    render_detail(&st, jar, &current, &task, form, FieldErrors::new()).await
}

/// Saves the edit form.
///
/// # Endpoint
///
/// `POST /secure/tasks/{id}`
pub async fn task_update(
    State(st): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(task_id): Path<Uuid>,
    jar: CookieJar,
    Form(form): Form<TaskForm>,
) -> Result<Response, AppError> {
    if !st.csrf.verify_token(form.csrf_token.as_deref(), &jar) {
        return Ok(invalid_request().into_response());
    }

    let task = load_task(&st, current.user.id, task_id).await?;
    let view = TaskFormView::from_form(&form);

    let update = match form.into_update(task_id) {
        Ok(update) => update,
        Err(errors) => return render_detail(&st, jar, &current, &task, view, errors).await,
    };

    st.tasks.update_task(current.user.id, update).await?;
    Ok(Redirect::to(&format!("/secure/tasks/{task_id}")).into_response())
}

/// Moves a task to another status.
///
/// # Endpoint
///
/// `POST /secure/tasks/{id}/status`
pub async fn task_status(
    State(st): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(task_id): Path<Uuid>,
    jar: CookieJar,
    Form(form): Form<TaskStatusForm>,
) -> Result<Response, AppError> {
    if !st.csrf.verify_token(form.csrf_token.as_deref(), &jar) {
        return Ok(invalid_request().into_response());
    }

    let status = form.parse_status().map_err(|_| {
        AppError::bad_request("Unknown status", json!({ "status": form.status }))
    })?;

    st.tasks.set_status(current.user.id, task_id, status).await?;
    Ok(Redirect::to("/secure/tasks").into_response())
}

/// Deletes a task.
///
/// # Endpoint
///
/// `POST /secure/tasks/{id}/delete`
pub async fn task_delete(
    State(st): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(task_id): Path<Uuid>,
    jar: CookieJar,
    Form(form): Form<DeleteForm>,
) -> Result<Response, AppError> {
    if !st.csrf.verify_token(form.csrf_token.as_deref(), &jar) {
        return Ok(invalid_request().into_response());
    }

    st.tasks.delete_task(current.user.id, task_id).await?;
    Ok(Redirect::to("/secure/tasks").into_response())
}
