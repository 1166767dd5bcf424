//! Repository trait for tasks.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{NewTask, Task, TaskUpdate};
use crate::error::AppError;

/// Repository interface for the per-user task list.
///
/// Every operation takes the owner's id; implementations must never read or
/// modify another user's tasks.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTaskRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Lists the user's tasks, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, AppError>;

    /// Finds one of the user's tasks.
    async fn find_by_id(&self, user_id: Uuid, task_id: Uuid) -> Result<Option<Task>, AppError>;

    /// Creates a task owned by the user.
    async fn create(&self, user_id: Uuid, task: NewTask) -> Result<Task, AppError>;

    /// Applies a partial update and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the task does not exist or belongs to
    /// someone else.
    async fn update(&self, user_id: Uuid, update: TaskUpdate) -> Result<Task, AppError>;

    /// Deletes one task.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if a row was deleted
    /// - `Ok(false)` if no matching task exists
    async fn delete(&self, user_id: Uuid, task_id: Uuid) -> Result<bool, AppError>;

    /// Deletes every task of the user, returning the number removed.
    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<u64, AppError>;
}
