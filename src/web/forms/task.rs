use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{FieldErrors, invalid, non_blank};
use crate::domain::entities::{NewTask, TaskPriority, TaskStatus, TaskUpdate};

const TITLE_MAX_LEN: usize = 200;
const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Task creation or edit form.
///
/// `status`, `priority` and `dueDate` come from select/date inputs; an empty
/// value means "not given".
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskForm {
    #[serde(default)]
    #[validate(custom(function = "validate_title"))]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub priority: String,

    /// `YYYY-MM-DD`, or empty for no due date.
    #[serde(default)]
    pub due_date: String,

    #[serde(default)]
    pub csrf_token: Option<String>,
}

impl TaskForm {
    /// Validates the form and converts it into a new task.
    ///
    /// Missing status and priority fall back to their defaults.
    pub fn into_new_task(self) -> Result<NewTask, FieldErrors> {
        let (form, fields) = self.checked()?;

        Ok(NewTask {
            title: form.title.trim().to_string(),
            description: non_blank(form.description),
            status: fields.status.unwrap_or_default(),
            priority: fields.priority.unwrap_or_default(),
            due_date: fields.due_date,
        })
    }

    /// Validates the form and converts it into a full update of task `id`.
    ///
    /// A blank description or due date clears the stored value.
    pub fn into_update(self, id: Uuid) -> Result<TaskUpdate, FieldErrors> {
        let (form, fields) = self.checked()?;

        Ok(TaskUpdate {
            id,
            title: Some(form.title.trim().to_string()),
            description: Some(non_blank(form.description)),
            status: fields.status,
            priority: fields.priority,
            due_date: Some(fields.due_date),
        })
    }

    /// Runs the declarative rules and parses the typed fields, collecting
    /// every failure into one set of errors.
    fn checked(self) -> Result<(Self, ParsedFields), FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };

        let status = match given(&self.status).map(str::parse::<TaskStatus>) {
            Some(Ok(status)) => Some(status),
            Some(Err(_)) => {
                errors.insert("status", "Unknown status");
                None
            }
            None => None,
        };

        let priority = match given(&self.priority).map(str::parse::<TaskPriority>) {
            Some(Ok(priority)) => Some(priority),
            Some(Err(_)) => {
                errors.insert("priority", "Unknown priority");
                None
            }
            None => None,
        };

        let due_date =
            match given(&self.due_date).map(|d| NaiveDate::parse_from_str(d, DUE_DATE_FORMAT)) {
                Some(Ok(date)) => Some(date),
                Some(Err(_)) => {
                    errors.insert("dueDate", "Due date must be YYYY-MM-DD");
                    None
                }
                None => None,
            };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok((
            self,
            ParsedFields {
                status,
                priority,
                due_date,
            },
        ))
    }
}

struct ParsedFields {
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    due_date: Option<NaiveDate>,
}

/// Status change posted from the task list.
///
/// The status stays text until [`TaskStatusForm::parse_status`] so a bad
/// value is reported after the anti-forgery check instead of as a body
/// rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusForm {
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub csrf_token: Option<String>,
}

impl TaskStatusForm {
    pub fn parse_status(&self) -> Result<TaskStatus, FieldErrors> {
        self.status.trim().parse().map_err(|_| {
            let mut errors = FieldErrors::new();
            errors.insert("status", "Unknown status");
            errors
        })
    }
}

fn given(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|v| !v.is_empty())
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(invalid("required", "Title is required"));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(invalid("length", "Title is too long"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str) -> TaskForm {
        TaskForm {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_form_uses_defaults() {
        let task = form("Buy milk").into_new_task().unwrap();

        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert!(task.description.is_none());
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_full_form() {
        let task = TaskForm {
            title: "Ship release".into(),
            description: Some("tag and publish".into()),
            status: "in_progress".into(),
            priority: "high".into(),
            due_date: "2026-11-01".into(),
            csrf_token: Some("t".into()),
        }
        .into_new_task()
        .unwrap();

        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2026, 11, 1));
        assert_eq!(task.description.as_deref(), Some("tag and publish"));
    }

    #[test]
    fn test_title_rules() {
        let errors = form("   ").into_new_task().unwrap_err();
        assert_eq!(errors.get("title"), Some("Title is required"));

        let errors = form(&"t".repeat(201)).into_new_task().unwrap_err();
        assert_eq!(errors.get("title"), Some("Title is too long"));

        assert!(form(&"t".repeat(200)).into_new_task().is_ok());
    }

    #[test]
    fn test_invalid_due_date_and_status() {
        let errors = TaskForm {
            due_date: "01/11/2026".into(),
            status: "done".into(),
            ..form("Ship")
        }
        .into_new_task()
        .unwrap_err();

        assert_eq!(errors.get("dueDate"), Some("Due date must be YYYY-MM-DD"));
        assert_eq!(errors.get("status"), Some("Unknown status"));
    }

    #[test]
    fn test_status_form_parsing() {
        let ok = TaskStatusForm {
            status: "completed".into(),
            csrf_token: None,
        };
        assert_eq!(ok.parse_status().unwrap(), TaskStatus::Completed);

        let bad = TaskStatusForm {
            status: "archived".into(),
            csrf_token: None,
        };
        assert_eq!(
            bad.parse_status().unwrap_err().get("status"),
            Some("Unknown status")
        );
    }

    #[test]
    fn test_update_clears_blank_optionals() {
        let id = Uuid::new_v4();
        let update = TaskForm {
            description: Some("".into()),
            due_date: String::new(),
            ..form("Ship")
        }
        .into_update(id)
        .unwrap();

        assert_eq!(update.id, id);
        assert_eq!(update.description, Some(None));
        assert_eq!(update.due_date, Some(None));
    }
}
