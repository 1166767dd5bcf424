//! PostgreSQL implementation of task repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{NewTask, Task, TaskUpdate};
use crate::domain::repositories::TaskRepository;
use crate::error::AppError;

const TASK_COLUMNS: &str =
    "id, title, description, status, priority, due_date, created_at, updated_at, user_id";

/// PostgreSQL repository for the `tasks` table.
///
/// Every statement filters on `user_id`, so a task id alone never grants access.
pub struct PgTaskRepository {
    pool: Arc<PgPool>,
}

impl PgTaskRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// Raw row; `status` and `priority` are stored as constrained text.
#[derive(sqlx::FromRow)]
struct TaskRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    status: String,
    priority: String,
    due_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    user_id: Uuid,
}

impl TryFrom<TaskRow> for Task {
    type Error = AppError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let corrupt = |e: crate::domain::entities::ParseTaskFieldError| {
            AppError::internal(
                "Corrupt task row",
                json!({ "id": row.id, "reason": e.to_string() }),
            )
        };

        Ok(Task {
            id: row.id,
            title: row.title,
            description: row.description,
            status: row.status.parse().map_err(corrupt)?,
            priority: row.priority.parse().map_err(corrupt)?,
            due_date: row.due_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
            user_id: row.user_id,
        })
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, AppError> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(Task::try_from).collect()
    }

    async fn find_by_id(&self, user_id: Uuid, task_id: Uuid) -> Result<Option<Task>, AppError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2"
        ))
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Task::try_from).transpose()
    }

    async fn create(&self, user_id: Uuid, task: NewTask) -> Result<Task, AppError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            r#"
            INSERT INTO tasks (title, description, status, priority, due_date, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(task.due_date)
        .bind(user_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Task::try_from(row)
    }

    async fn update(&self, user_id: Uuid, update: TaskUpdate) -> Result<Task, AppError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            r#"
            UPDATE tasks
            SET title       = COALESCE($3, title),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                status      = COALESCE($6, status),
                priority    = COALESCE($7, priority),
                due_date    = CASE WHEN $8 THEN $9 ELSE due_date END,
                updated_at  = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(update.id)
        .bind(user_id)
        .bind(update.title.as_deref())
        .bind(update.description.is_some())
        .bind(update.description.clone().flatten())
        .bind(update.status.map(|s| s.as_str()))
        .bind(update.priority.map(|p| p.as_str()))
        .bind(update.due_date.is_some())
        .bind(update.due_date.flatten())
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or_else(|| AppError::not_found("Task not found", json!({ "id": update.id })))?;

        Task::try_from(row)
    }

    async fn delete(&self, user_id: Uuid, task_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(task_id)
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}
