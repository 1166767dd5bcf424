#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;
use cookie::Cookie;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use task_portal::application::services::{AccountService, CsrfConfig, CsrfGuard, TaskService};
use task_portal::domain::entities::{
    IdentityError, NewProfile, NewTask, Profile, Session, SignUpOutcome, Task, TaskUpdate, User,
    UserUpdate,
};
use task_portal::domain::repositories::{IdentityBackend, ProfileRepository, TaskRepository};
use task_portal::error::AppError;
use task_portal::routes::unthrottled_router;
use task_portal::state::AppState;
use task_portal::web::session::SESSION_COOKIE_NAME;
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "secret123";

// ─── IDENTITY ────────────────────────────────────────────────────────────────

struct Account {
    user: User,
    password: String,
}

/// In-memory identity backend.
///
/// Access tokens are `token-<user id>`. Every trait call is counted so tests
/// can assert that a rejected request never reached the backend.
#[derive(Default)]
pub struct FakeIdentity {
    pub(crate) accounts: Mutex<HashMap<String, Account>>,
    pub(crate) sessions: Mutex<HashMap<String, Uuid>>,
    pub(crate) calls: AtomicUsize,
    /// When set, sign-up returns no session.
    pub require_confirmation: bool,
    /// When set, the health probe reports the backend as down.
    pub unreachable: bool,
    /// When set, the backend has no administrative credentials.
    pub without_admin: bool,
}

impl FakeIdentity {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn has_user(&self, user_id: Uuid) -> bool {
        self.accounts
            .lock()
            .unwrap()
            .values()
            .any(|a| a.user.id == user_id)
    }

    pub fn email_of(&self, user_id: Uuid) -> Option<String> {
        self.accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.user.id == user_id)
            .map(|a| a.user.email.clone())
    }

    /// Registers a confirmed user and returns a live session for it.
    pub fn seed_user(&self, email: &str, password: &str) -> Session {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            email_confirmed_at: Some(Utc::now()),
        };
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            Account {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        self.open_session(user)
    }

    fn open_session(&self, user: User) -> Session {
        let token = format!("token-{}", user.id);
        self.sessions.lock().unwrap().insert(token.clone(), user.id);
        Session {
            access_token: token,
            refresh_token: "refresh".to_string(),
            expires_in: 3600,
            user,
        }
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl IdentityBackend for FakeIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        self.hit();
        let user = {
            let accounts = self.accounts.lock().unwrap();
            match accounts.get(email) {
                Some(a) if a.password == password => a.user.clone(),
                _ => return Err(IdentityError::InvalidCredentials),
            }
        };
        if user.email_confirmed_at.is_none() {
            return Err(IdentityError::EmailNotConfirmed);
        }
        Ok(self.open_session(user))
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, IdentityError> {
        self.hit();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            email_confirmed_at: (!self.require_confirmation).then(Utc::now),
        };
        {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.contains_key(email) {
                return Err(IdentityError::UserAlreadyExists);
            }
            accounts.insert(
                email.to_string(),
                Account {
                    user: user.clone(),
                    password: password.to_string(),
                },
            );
        }

        let session = (!self.require_confirmation).then(|| self.open_session(user.clone()));
        Ok(SignUpOutcome { user, session })
    }

    async fn get_user(&self, access_token: &str) -> Result<User, IdentityError> {
        self.hit();
        let user_id = self
            .sessions
            .lock()
            .unwrap()
            .get(access_token)
            .copied()
            .ok_or(IdentityError::InvalidSession)?;
        self.accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.user.id == user_id)
            .map(|a| a.user.clone())
            .ok_or(IdentityError::InvalidSession)
    }

    async fn update_user(
        &self,
        access_token: &str,
        update: UserUpdate,
    ) -> Result<User, IdentityError> {
        let user = self.get_user(access_token).await?;
        let mut accounts = self.accounts.lock().unwrap();
        let key = user.email.clone();
        let mut account = accounts.remove(&key).ok_or(IdentityError::InvalidSession)?;

        if let Some(password) = update.password {
            account.password = password;
        }
        if let Some(email) = update.email {
            account.user.email = email;
        }

        let updated = account.user.clone();
        accounts.insert(updated.email.clone(), account);
        Ok(updated)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        self.hit();
        self.sessions.lock().unwrap().remove(access_token);
        Ok(())
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<(), IdentityError> {
        self.hit();
        if self.without_admin {
            return Err(IdentityError::Unavailable(
                "service role key is not configured".to_string(),
            ));
        }
        self.accounts
            .lock()
            .unwrap()
            .retain(|_, a| a.user.id != user_id);
        Ok(())
    }

    fn can_delete_users(&self) -> bool {
        !self.without_admin
    }

    async fn health_check(&self) -> bool {
        !self.unreachable
    }
}

// ─── REPOSITORIES ────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryProfiles {
    rows: Mutex<HashMap<Uuid, Profile>>,
}

impl InMemoryProfiles {
    pub fn get(&self, user_id: Uuid) -> Option<Profile> {
        self.rows.lock().unwrap().get(&user_id).cloned()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfiles {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<Profile>, AppError> {
        Ok(self.get(user_id))
    }

    async fn create(&self, profile: NewProfile) -> Result<Profile, AppError> {
        let now = Utc::now();
        let row = Profile {
            id: profile.id,
            first_name: Some(profile.first_name),
            last_name: Some(profile.last_name),
            avatar_url: None,
            website: None,
            bio: None,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_names(
        &self,
        user_id: Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<Profile, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .get_mut(&user_id)
            .ok_or_else(|| AppError::not_found("Profile not found", json!({})))?;
        row.first_name = Some(first_name.to_string());
        row.last_name = Some(last_name.to_string());
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, user_id: Uuid) -> Result<(), AppError> {
        self.rows.lock().unwrap().remove(&user_id);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[derive(Default)]
pub struct InMemoryTasks {
    rows: Mutex<Vec<Task>>,
}

impl InMemoryTasks {
    pub fn all(&self) -> Vec<Task> {
        self.rows.lock().unwrap().clone()
    }

    pub fn count_for(&self, user_id: Uuid) -> usize {
        self.all().iter().filter(|t| t.user_id == user_id).count()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTasks {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, AppError> {
        let mut tasks: Vec<Task> = self
            .all()
            .into_iter()
            .filter(|t| t.user_id == user_id)
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn find_by_id(&self, user_id: Uuid, task_id: Uuid) -> Result<Option<Task>, AppError> {
        Ok(self
            .all()
            .into_iter()
            .find(|t| t.id == task_id && t.user_id == user_id))
    }

    async fn create(&self, user_id: Uuid, task: NewTask) -> Result<Task, AppError> {
        let now = Utc::now();
        let row = Task {
            id: Uuid::new_v4(),
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            due_date: task.due_date,
            created_at: now,
            updated_at: now,
            user_id,
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn update(&self, user_id: Uuid, update: TaskUpdate) -> Result<Task, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|t| t.id == update.id && t.user_id == user_id)
            .ok_or_else(|| AppError::not_found("Task not found", json!({ "id": update.id })))?;

        if let Some(title) = update.title {
            row.title = title;
        }
        if let Some(description) = update.description {
            row.description = description;
        }
        if let Some(status) = update.status {
            row.status = status;
        }
        if let Some(priority) = update.priority {
            row.priority = priority;
        }
        if let Some(due_date) = update.due_date {
            row.due_date = due_date;
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, user_id: Uuid, task_id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|t| !(t.id == task_id && t.user_id == user_id));
        Ok(rows.len() < before)
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<u64, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|t| t.user_id != user_id);
        Ok((before - rows.len()) as u64)
    }
}

// ─── APP ─────────────────────────────────────────────────────────────────────

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub identity: Arc<FakeIdentity>,
    pub profiles: Arc<InMemoryProfiles>,
    pub tasks: Arc<InMemoryTasks>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_identity(FakeIdentity::default())
    }

    pub fn with_identity(identity: FakeIdentity) -> Self {
        let identity = Arc::new(identity);
        let profiles = Arc::new(InMemoryProfiles::default());
        let tasks = Arc::new(InMemoryTasks::default());

        let accounts = Arc::new(AccountService::new(
            identity.clone(),
            profiles.clone(),
            tasks.clone(),
        ));
        let task_service = Arc::new(TaskService::new(tasks.clone()));
        let csrf = Arc::new(CsrfGuard::new(CsrfConfig::new(TEST_SECRET)));

        let state = AppState::new(csrf, accounts, task_service, false);
        let server = TestServer::new(unthrottled_router(state.clone())).unwrap();

        Self {
            server,
            state,
            identity,
            profiles,
            tasks,
        }
    }

    /// Issues a token from the app's guard and returns it with its cookie.
    pub fn csrf(&self) -> (String, Cookie<'static>) {
        let (token, cookie) = self.state.csrf.issue_token();
        (token.into_inner(), cookie)
    }

    /// Seeds a user with a profile and returns its session cookie and id.
    pub async fn signed_in(&self, email: &str) -> (Cookie<'static>, Uuid) {
        let session = self.identity.seed_user(email, PASSWORD);
        self.profiles
            .create(NewProfile {
                id: session.user.id,
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
            })
            .await
            .unwrap();

        (
            Cookie::new(SESSION_COOKIE_NAME, session.access_token),
            session.user.id,
        )
    }
}

pub fn location(response: &axum_test::TestResponse) -> String {
    response
        .header("location")
        .to_str()
        .unwrap()
        .to_string()
}
