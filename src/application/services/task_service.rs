//! Per-user task list service.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{NewTask, Task, TaskStatus, TaskUpdate};
use crate::domain::repositories::TaskRepository;
use crate::error::AppError;

/// Service for reading and changing a user's tasks.
///
/// Every call takes the owner's id; the repository scopes all queries by it.
pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }

    /// Lists the user's tasks, newest first.
    ///
    /// A storage failure is logged and yields an empty list so the page still
    /// renders.
    pub async fn list_tasks(&self, user_id: Uuid) -> Vec<Task> {
        match self.repository.list_for_user(user_id).await {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::error!(%user_id, error = %e, "Error fetching tasks");
                Vec::new()
            }
        }
    }

    /// Fetches one task. Absence and storage failures both yield `None`.
    pub async fn get_task(&self, user_id: Uuid, task_id: Uuid) -> Option<Task> {
        match self.repository.find_by_id(user_id, task_id).await {
            Ok(task) => task,
            Err(e) => {
                tracing::error!(%task_id, error = %e, "Error fetching task");
                None
            }
        }
    }

    pub async fn create_task(&self, user_id: Uuid, task: NewTask) -> Result<Task, AppError> {
        let task = self.repository.create(user_id, task).await?;
        tracing::debug!(task_id = %task.id, "Task created");
        Ok(task)
    }

    pub async fn update_task(&self, user_id: Uuid, update: TaskUpdate) -> Result<Task, AppError> {
        self.repository.update(user_id, update).await
    }

    /// Moves a task to another status.
    pub async fn set_status(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        status: TaskStatus,
    ) -> Result<Task, AppError> {
        self.repository
            .update(user_id, TaskUpdate::status(task_id, status))
            .await
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user owns no task with this id.
    pub async fn delete_task(&self, user_id: Uuid, task_id: Uuid) -> Result<(), AppError> {
        if self.repository.delete(user_id, task_id).await? {
            Ok(())
        } else {
            Err(AppError::not_found(
                "Task not found",
                json!({ "id": task_id }),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::TaskPriority;
    use crate::domain::repositories::MockTaskRepository;
    use chrono::Utc;

    fn task(user_id: Uuid, title: &str) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            due_date: None,
            created_at: now,
            updated_at: now,
            user_id,
        }
    }

    #[tokio::test]
    async fn test_list_tasks_returns_repository_order() {
        let user_id = Uuid::new_v4();
        let tasks = vec![task(user_id, "newer"), task(user_id, "older")];
        let expected = tasks.clone();

        let mut repo = MockTaskRepository::new();
        repo.expect_list_for_user()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(tasks.clone()));

        let service = TaskService::new(Arc::new(repo));
        assert_eq!(service.list_tasks(user_id).await, expected);
    }

    #[tokio::test]
    async fn test_list_tasks_error_yields_empty() {
        let mut repo = MockTaskRepository::new();
        repo.expect_list_for_user()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = TaskService::new(Arc::new(repo));
        assert!(service.list_tasks(Uuid::new_v4()).await.is_empty());
    }

    #[tokio::test]
    async fn test_get_task_error_yields_none() {
        let mut repo = MockTaskRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .returning(|_, _| Err(AppError::internal("Database error", json!({}))));

        let service = TaskService::new(Arc::new(repo));
        assert!(
            service
                .get_task(Uuid::new_v4(), Uuid::new_v4())
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_set_status_sends_status_only_update() {
        let user_id = Uuid::new_v4();
        let existing = task(user_id, "write docs");
        let task_id = existing.id;

        let mut repo = MockTaskRepository::new();
        repo.expect_update()
            .withf(move |uid, update| {
                *uid == user_id
                    && update.id == task_id
                    && update.status == Some(TaskStatus::Completed)
                    && update.title.is_none()
                    && update.description.is_none()
            })
            .times(1)
            .returning(move |_, _| {
                let mut done = existing.clone();
                done.status = TaskStatus::Completed;
                Ok(done)
            });

        let service = TaskService::new(Arc::new(repo));
        let updated = service
            .set_status(user_id, task_id, TaskStatus::Completed)
            .await
            .unwrap();

        assert_eq!(updated.status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn test_delete_missing_task_is_not_found() {
        let mut repo = MockTaskRepository::new();
        repo.expect_delete().times(1).returning(|_, _| Ok(false));

        let service = TaskService::new(Arc::new(repo));
        let result = service.delete_task(Uuid::new_v4(), Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }
}
