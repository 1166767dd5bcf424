//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: `SELECT 1` through the profile store
/// 2. **Identity**: the identity backend's own health endpoint
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected" },
///     "identity": { "status": "ok", "message": "Reachable" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let (db_healthy, identity_healthy) = tokio::join!(
        state.accounts.database_healthy(),
        state.accounts.identity_healthy()
    );

    let database = CheckStatus::from_probe(db_healthy, "Connected", "Database query failed");
    let identity = CheckStatus::from_probe(
        identity_healthy,
        "Reachable",
        "Identity backend unreachable",
    );

    let all_healthy = database.is_ok() && identity.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks { database, identity },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        tracing::warn!(db_healthy, identity_healthy, "Health check degraded");
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
