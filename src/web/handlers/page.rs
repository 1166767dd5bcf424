//! View models shared by several page templates.

use crate::domain::entities::{Profile, TaskPriority, TaskStatus, User};

/// Navigation bar data for signed-in pages.
#[derive(Debug, Clone)]
pub struct NavView {
    pub email: String,
    pub initials: String,
}

impl NavView {
    /// Uses the profile's initials, or the first letter of the email when
    /// the profile has no names.
    pub fn new(user: &User, profile: Option<&Profile>) -> Self {
        let initials = profile
            .map(Profile::initials)
            .filter(|i| !i.is_empty())
            .unwrap_or_else(|| {
                user.email
                    .chars()
                    .next()
                    .map(|c| c.to_uppercase().collect())
                    .unwrap_or_else(|| "?".to_string())
            });

        Self {
            email: user.email.clone(),
            initials,
        }
    }
}

/// One `<option>` of a `<select>`.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

pub fn status_options(selected: Option<TaskStatus>) -> Vec<SelectOption> {
    let selected = selected.unwrap_or_default();
    TaskStatus::ALL
        .iter()
        .map(|s| SelectOption {
            value: s.as_str(),
            label: s.label(),
            selected: *s == selected,
        })
        .collect()
}

pub fn priority_options(selected: Option<TaskPriority>) -> Vec<SelectOption> {
    let selected = selected.unwrap_or_default();
    TaskPriority::ALL
        .iter()
        .map(|p| SelectOption {
            value: p.as_str(),
            label: p.label(),
            selected: *p == selected,
        })
        .collect()
}
