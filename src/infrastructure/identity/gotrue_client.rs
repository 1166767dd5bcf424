//! Identity backend client for a GoTrue-compatible HTTP API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

use crate::domain::entities::{IdentityError, Session, SignUpOutcome, User, UserUpdate};
use crate::domain::repositories::IdentityBackend;

/// Tracing target for identity backend calls.
pub const TRACING_TARGET: &str = "task_portal::identity";

/// Connection settings for [`GoTrueClient`].
#[derive(Clone)]
pub struct GoTrueConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub base_url: Url,
    /// Public API key sent as `apikey` on every request.
    pub anon_key: String,
    /// Administrative key; required only for deleting users.
    pub service_role_key: Option<String>,
    pub timeout: Duration,
}

impl std::fmt::Debug for GoTrueConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoTrueConfig")
            .field("base_url", &self.base_url.as_str())
            .field("service_role_key", &self.service_role_key.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// HTTP client for the hosted identity service.
#[derive(Clone, Debug)]
pub struct GoTrueClient {
    http: Client,
    config: GoTrueConfig,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct UserAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
}

/// Error payload. Newer servers send `error_code`/`msg`, older ones
/// `error`/`error_description`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error_code: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

impl GoTrueClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Unavailable`] if the HTTP client cannot be built.
    pub fn new(mut config: GoTrueConfig) -> Result<Self, IdentityError> {
        // `Url::join` replaces the last segment unless the base ends with '/'.
        if !config.base_url.path().ends_with('/') {
            let path = format!("{}/", config.base_url.path());
            config.base_url.set_path(&path);
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(transport_error)?;

        tracing::debug!(
            target: TRACING_TARGET,
            base_url = %config.base_url,
            timeout_ms = config.timeout.as_millis(),
            "Identity client created"
        );

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GoTrueConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> Result<Url, IdentityError> {
        self.config
            .base_url
            .join(path)
            .map_err(|e| IdentityError::Unavailable(format!("invalid endpoint {path}: {e}")))
    }

    fn request(&self, method: reqwest::Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.config.anon_key)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, IdentityError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        let error = classify_error(status, body);

        tracing::debug!(
            target: TRACING_TARGET,
            status = status.as_u16(),
            error = %error,
            "Identity backend returned an error"
        );

        Err(error)
    }
}

#[async_trait]
impl IdentityBackend for GoTrueClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .send(
                self.request(reqwest::Method::POST, url)
                    .json(&Credentials { email, password }),
            )
            .await?;

        response.json::<Session>().await.map_err(transport_error)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, IdentityError> {
        let url = self.endpoint("auth/v1/signup")?;

        let response = self
            .send(
                self.request(reqwest::Method::POST, url)
                    .json(&Credentials { email, password }),
            )
            .await?;

        let body: Value = response.json().await.map_err(transport_error)?;
        parse_sign_up(body)
    }

    async fn get_user(&self, access_token: &str) -> Result<User, IdentityError> {
        let url = self.endpoint("auth/v1/user")?;

        let response = self
            .send(
                self.request(reqwest::Method::GET, url)
                    .bearer_auth(access_token),
            )
            .await?;

        response.json::<User>().await.map_err(transport_error)
    }

    async fn update_user(
        &self,
        access_token: &str,
        update: UserUpdate,
    ) -> Result<User, IdentityError> {
        let url = self.endpoint("auth/v1/user")?;

        let attributes = UserAttributes {
            email: update.email,
            password: update.password,
        };

        let response = self
            .send(
                self.request(reqwest::Method::PUT, url)
                    .bearer_auth(access_token)
                    .json(&attributes),
            )
            .await?;

        response.json::<User>().await.map_err(transport_error)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        let url = self.endpoint("auth/v1/logout")?;

        self.send(
            self.request(reqwest::Method::POST, url)
                .bearer_auth(access_token),
        )
        .await?;

        Ok(())
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<(), IdentityError> {
        let service_key = self.config.service_role_key.as_deref().ok_or_else(|| {
            IdentityError::Unavailable("service role key is not configured".to_string())
        })?;

        let url = self.endpoint(&format!("auth/v1/admin/users/{user_id}"))?;

        self.send(
            self.http
                .delete(url)
                .header("apikey", service_key)
                .bearer_auth(service_key),
        )
        .await?;

        tracing::info!(target: TRACING_TARGET, %user_id, "User deleted");

        Ok(())
    }

    fn can_delete_users(&self) -> bool {
        self.config.service_role_key.is_some()
    }

    async fn health_check(&self) -> bool {
        let Ok(url) = self.endpoint("auth/v1/health") else {
            return false;
        };

        match self.request(reqwest::Method::GET, url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!(target: TRACING_TARGET, error = %e, "Identity health check failed");
                false
            }
        }
    }
}

fn transport_error(e: reqwest::Error) -> IdentityError {
    IdentityError::Unavailable(e.to_string())
}

/// Maps a failed response onto [`IdentityError`].
///
/// Prefers the machine-readable `error_code`; falls back to the message text
/// for servers that only send `error_description`.
fn classify_error(status: StatusCode, body: ErrorBody) -> IdentityError {
    let message = body
        .msg
        .or(body.error_description)
        .or(body.message)
        .or(body.error)
        .unwrap_or_else(|| status.to_string());

    match body.error_code.as_deref() {
        Some("invalid_credentials") => return IdentityError::InvalidCredentials,
        Some("email_not_confirmed") => return IdentityError::EmailNotConfirmed,
        Some("user_already_exists" | "email_exists") => return IdentityError::UserAlreadyExists,
        Some("bad_jwt" | "session_not_found" | "session_expired" | "no_authorization") => {
            return IdentityError::InvalidSession;
        }
        _ => {}
    }

    if message.contains("Invalid login credentials") {
        IdentityError::InvalidCredentials
    } else if message.contains("Email not confirmed") {
        IdentityError::EmailNotConfirmed
    } else if message.contains("already registered") {
        IdentityError::UserAlreadyExists
    } else if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        IdentityError::InvalidSession
    } else if status.is_server_error() {
        IdentityError::Unavailable(message)
    } else {
        IdentityError::Rejected(message)
    }
}

/// Sign-up answers with a session when email confirmation is disabled and
/// with the bare user otherwise.
fn parse_sign_up(body: Value) -> Result<SignUpOutcome, IdentityError> {
    let malformed = |e: serde_json::Error| {
        IdentityError::Unavailable(format!("malformed sign-up response: {e}"))
    };

    if body.get("access_token").is_some() {
        let session: Session = serde_json::from_value(body).map_err(malformed)?;
        return Ok(SignUpOutcome {
            user: session.user.clone(),
            session: Some(session),
        });
    }

    let user_value = match body.get("user") {
        Some(user) => user.clone(),
        None => body,
    };
    let user: User = serde_json::from_value(user_value).map_err(malformed)?;

    Ok(SignUpOutcome {
        user,
        session: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(error_code: Option<&str>, msg: Option<&str>) -> ErrorBody {
        ErrorBody {
            error_code: error_code.map(str::to_string),
            msg: msg.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_classify_by_error_code() {
        assert_eq!(
            classify_error(StatusCode::BAD_REQUEST, body(Some("invalid_credentials"), None)),
            IdentityError::InvalidCredentials
        );
        assert_eq!(
            classify_error(StatusCode::BAD_REQUEST, body(Some("email_not_confirmed"), None)),
            IdentityError::EmailNotConfirmed
        );
        assert_eq!(
            classify_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                body(Some("user_already_exists"), None)
            ),
            IdentityError::UserAlreadyExists
        );
        assert_eq!(
            classify_error(StatusCode::FORBIDDEN, body(Some("bad_jwt"), None)),
            IdentityError::InvalidSession
        );
    }

    #[test]
    fn test_classify_legacy_description() {
        let legacy = ErrorBody {
            error: Some("invalid_grant".to_string()),
            error_description: Some("Invalid login credentials".to_string()),
            ..Default::default()
        };

        assert_eq!(
            classify_error(StatusCode::BAD_REQUEST, legacy),
            IdentityError::InvalidCredentials
        );
    }

    #[test]
    fn test_classify_fallbacks() {
        assert_eq!(
            classify_error(StatusCode::UNAUTHORIZED, ErrorBody::default()),
            IdentityError::InvalidSession
        );
        assert!(matches!(
            classify_error(StatusCode::BAD_GATEWAY, body(None, Some("upstream down"))),
            IdentityError::Unavailable(msg) if msg == "upstream down"
        ));
        assert!(matches!(
            classify_error(StatusCode::BAD_REQUEST, body(None, Some("Password too weak"))),
            IdentityError::Rejected(msg) if msg == "Password too weak"
        ));
    }

    #[test]
    fn test_parse_sign_up_with_session() {
        let outcome = parse_sign_up(json!({
            "access_token": "at",
            "refresh_token": "rt",
            "expires_in": 3600,
            "user": {"id": "6f1c2a7e-3c55-4d0e-9a4e-2b1f0e5d9c11", "email": "a@b.co"}
        }))
        .unwrap();

        assert!(outcome.session.is_some());
        assert_eq!(outcome.user.email, "a@b.co");
    }

    #[test]
    fn test_parse_sign_up_pending_confirmation() {
        let outcome = parse_sign_up(json!({
            "id": "6f1c2a7e-3c55-4d0e-9a4e-2b1f0e5d9c11",
            "email": "a@b.co",
            "confirmation_sent_at": "2026-01-01T00:00:00Z"
        }))
        .unwrap();

        assert!(outcome.session.is_none());
        assert_eq!(outcome.user.email, "a@b.co");
    }

    #[test]
    fn test_parse_sign_up_malformed() {
        assert!(matches!(
            parse_sign_up(json!({"unexpected": true})),
            Err(IdentityError::Unavailable(_))
        ));
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = GoTrueClient::new(GoTrueConfig {
            base_url: Url::parse("https://project.supabase.co/base").unwrap(),
            anon_key: "anon".to_string(),
            service_role_key: None,
            timeout: Duration::from_secs(5),
        })
        .unwrap();

        assert_eq!(
            client.endpoint("auth/v1/user").unwrap().as_str(),
            "https://project.supabase.co/base/auth/v1/user"
        );
    }

    #[tokio::test]
    async fn test_delete_user_requires_service_key() {
        let client = GoTrueClient::new(GoTrueConfig {
            base_url: Url::parse("http://127.0.0.1:9").unwrap(),
            anon_key: "anon".to_string(),
            service_role_key: None,
            timeout: Duration::from_secs(1),
        })
        .unwrap();

        assert!(!client.can_delete_users());
        assert!(matches!(
            client.delete_user(Uuid::new_v4()).await,
            Err(IdentityError::Unavailable(_))
        ));
    }
}
