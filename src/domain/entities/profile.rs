//! Profile entity stored alongside each identity.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Per-user profile row. `id` equals the identity's user id.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
    pub website: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Full name for greetings, falling back to whichever part is present.
    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// Upper-cased initials shown in the navigation avatar.
    pub fn initials(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter_map(|name| name.trim().chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// Input data for creating a profile right after sign-up.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(first: Option<&str>, last: Option<&str>) -> Profile {
        let now = Utc::now();
        Profile {
            id: Uuid::new_v4(),
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            avatar_url: None,
            website: None,
            bio: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(
            profile(Some("John"), Some("Doe")).display_name().as_deref(),
            Some("John Doe")
        );
        assert_eq!(
            profile(Some("John"), None).display_name().as_deref(),
            Some("John")
        );
        assert_eq!(profile(Some("  "), None).display_name(), None);
    }

    #[test]
    fn test_initials() {
        assert_eq!(profile(Some("john"), Some("doe")).initials(), "JD");
        assert_eq!(profile(None, Some("doe")).initials(), "D");
        assert_eq!(profile(None, None).initials(), "");
    }
}
