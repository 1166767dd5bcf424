//! Task entity and its enumerated attributes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Returned when a stored or submitted value is not a known variant.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task {field}: {value}")]
pub struct ParseTaskFieldError {
    pub field: &'static str,
    pub value: String,
}

/// Progress of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseTaskFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(ParseTaskFieldError {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// Importance of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = ParseTaskFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ParseTaskFieldError {
                field: "priority",
                value: other.to_string(),
            }),
        }
    }
}

/// A task owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Uuid,
}

impl Task {
    /// Returns true if the task is not completed and its due date has passed.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != TaskStatus::Completed && self.due_date.is_some_and(|d| d < today)
    }
}

/// Input data for creating a task. Ownership is supplied separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
}

/// Partial update for an existing task.
///
/// `None` fields are left unchanged. `description: Some(None)` clears the
/// description; the same applies to `due_date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Option<NaiveDate>>,
}

impl TaskUpdate {
    /// An update that only changes the status.
    pub fn status(id: Uuid, status: TaskStatus) -> Self {
        Self {
            id,
            title: None,
            description: None,
            status: Some(status),
            priority: None,
            due_date: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
        let err = "done".parse::<TaskStatus>().unwrap_err();
        assert_eq!(err.field, "status");
        assert_eq!(err.value, "done");
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!("high".parse::<TaskPriority>().unwrap(), TaskPriority::High);
        assert!("urgent".parse::<TaskPriority>().is_err());
    }

    #[test]
    fn test_status_serde_matches_as_str() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn test_is_overdue() {
        let now = Utc::now();
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let mut task = Task {
            id: Uuid::new_v4(),
            title: "Write report".to_string(),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::High,
            due_date: NaiveDate::from_ymd_opt(2026, 3, 9),
            created_at: now,
            updated_at: now,
            user_id: Uuid::new_v4(),
        };

        assert!(task.is_overdue(today));

        task.status = TaskStatus::Completed;
        assert!(!task.is_overdue(today));

        task.status = TaskStatus::Pending;
        task.due_date = None;
        assert!(!task.is_overdue(today));
    }

    #[test]
    fn test_status_only_update() {
        let id = Uuid::new_v4();
        let update = TaskUpdate::status(id, TaskStatus::Completed);

        assert_eq!(update.id, id);
        assert_eq!(update.status, Some(TaskStatus::Completed));
        assert!(update.title.is_none());
        assert!(update.due_date.is_none());
    }
}
