//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, identity client setup, service wiring, and
//! the Axum server lifecycle.

use crate::application::services::{AccountService, CsrfGuard, TaskService};
use crate::config::Config;
use crate::domain::repositories::{IdentityBackend, ProfileRepository, TaskRepository};
use crate::infrastructure::identity::GoTrueClient;
use crate::infrastructure::persistence::{PgProfileRepository, PgTaskRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Opens the PostgreSQL pool using the configured limits.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Builds services and shared state from a pool and configuration.
///
/// # Errors
///
/// Returns an error if the identity client cannot be created.
pub fn build_state(config: &Config, pool: PgPool) -> Result<AppState> {
    let pool = Arc::new(pool);

    let identity: Arc<dyn IdentityBackend> = Arc::new(
        GoTrueClient::new(config.gotrue_config()?).context("Failed to create identity client")?,
    );
    let profiles: Arc<dyn ProfileRepository> = Arc::new(PgProfileRepository::new(pool.clone()));
    let tasks: Arc<dyn TaskRepository> = Arc::new(PgTaskRepository::new(pool));

    let accounts = Arc::new(AccountService::new(identity, profiles, tasks.clone()));
    let task_service = Arc::new(TaskService::new(tasks));
    let csrf = Arc::new(CsrfGuard::new(config.csrf_config()));

    Ok(AppState::new(
        csrf,
        accounts,
        task_service,
        config.is_production(),
    ))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Identity backend client
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    let state = build_state(&config, pool)?;
    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
