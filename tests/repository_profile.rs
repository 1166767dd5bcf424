use sqlx::PgPool;
use std::sync::Arc;
use task_portal::AppError;
use task_portal::domain::entities::NewProfile;
use task_portal::domain::repositories::ProfileRepository;
use task_portal::infrastructure::persistence::PgProfileRepository;
use uuid::Uuid;

fn new_profile(id: Uuid) -> NewProfile {
    NewProfile {
        id,
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
    }
}

#[sqlx::test]
async fn test_create_and_find_profile(pool: PgPool) {
    let repo = PgProfileRepository::new(Arc::new(pool));
    let id = Uuid::new_v4();

    let created = repo.create(new_profile(id)).await.unwrap();
    assert_eq!(created.id, id);
    assert_eq!(created.first_name.as_deref(), Some("Ada"));
    assert!(created.bio.is_none());

    let found = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found, created);
}

#[sqlx::test]
async fn test_find_missing_profile(pool: PgPool) {
    let repo = PgProfileRepository::new(Arc::new(pool));

    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[sqlx::test]
async fn test_duplicate_profile_is_conflict(pool: PgPool) {
    let repo = PgProfileRepository::new(Arc::new(pool));
    let id = Uuid::new_v4();

    repo.create(new_profile(id)).await.unwrap();
    let result = repo.create(new_profile(id)).await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[sqlx::test]
async fn test_update_names(pool: PgPool) {
    let repo = PgProfileRepository::new(Arc::new(pool));
    let id = Uuid::new_v4();
    let created = repo.create(new_profile(id)).await.unwrap();

    let updated = repo.update_names(id, "Grace", "Hopper").await.unwrap();

    assert_eq!(updated.first_name.as_deref(), Some("Grace"));
    assert_eq!(updated.last_name.as_deref(), Some("Hopper"));
    assert!(updated.updated_at >= created.updated_at);
}

#[sqlx::test]
async fn test_update_missing_profile_is_not_found(pool: PgPool) {
    let repo = PgProfileRepository::new(Arc::new(pool));

    let result = repo.update_names(Uuid::new_v4(), "Grace", "Hopper").await;

    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[sqlx::test]
async fn test_delete_profile_is_idempotent(pool: PgPool) {
    let repo = PgProfileRepository::new(Arc::new(pool));
    let id = Uuid::new_v4();
    repo.create(new_profile(id)).await.unwrap();

    repo.delete(id).await.unwrap();
    repo.delete(id).await.unwrap();

    assert!(repo.find_by_id(id).await.unwrap().is_none());
}

#[sqlx::test]
async fn test_health_check(pool: PgPool) {
    let repo = PgProfileRepository::new(Arc::new(pool));

    assert!(repo.health_check().await);
}
