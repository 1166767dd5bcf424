//! PostgreSQL implementation of profile repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{NewProfile, Profile};
use crate::domain::repositories::ProfileRepository;
use crate::error::AppError;

const PROFILE_COLUMNS: &str =
    "id, first_name, last_name, avatar_url, website, bio, created_at, updated_at";

/// PostgreSQL repository for the `profiles` table.
pub struct PgProfileRepository {
    pool: Arc<PgPool>,
}

impl PgProfileRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(profile)
    }

    async fn create(&self, profile: NewProfile) -> Result<Profile, AppError> {
        let created = sqlx::query_as::<_, Profile>(&format!(
            r#"
            INSERT INTO profiles (id, first_name, last_name, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(profile.id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(created)
    }

    async fn update_names(
        &self,
        user_id: Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<Profile, AppError> {
        sqlx::query_as::<_, Profile>(&format!(
            r#"
            UPDATE profiles
            SET first_name = $2, last_name = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(first_name)
        .bind(last_name)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or_else(|| AppError::not_found("Profile not found", json!({ "id": user_id })))
    }

    async fn delete(&self, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
