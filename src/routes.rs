//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /health`       - Health check: database and identity backend (public)
//! - `/`, `/auth/*`      - Landing, sign-in and sign-up pages (public)
//! - `/secure/*`         - Dashboard, profile and tasks (cookie session required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket, stricter on credential submissions
//! - **Authentication** - Cookie session on `/secure/*`
//! - **Security headers** - CSP and browser hardening headers on every response
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::health_handler;
use crate::api::middleware::{rate_limit, security_headers, tracing};
use crate::state::AppState;
use crate::web;
use crate::web::middleware::web_auth;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build(state, true))
}

/// Same routes and middleware as [`app_router`] without the per-IP rate
/// limiters, which need the peer address from `ConnectInfo`.
pub fn unthrottled_router(state: AppState) -> Router {
    build(state, false)
}

fn build(state: AppState, throttled: bool) -> Router {
    let protected = web::routes::protected_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        web_auth::layer,
    ));

    let mut pages = web::routes::public_routes().merge(protected);
    let mut credentials = web::routes::credential_routes();

    if throttled {
        pages = pages.layer(rate_limit::layer());
        credentials = credentials.layer(rate_limit::secure_layer());
    }

    let router = Router::new()
        .route("/health", get(health_handler))
        .merge(pages)
        .merge(credentials)
        .with_state(state)
        .layer(tracing::layer());

    security_headers::apply(router)
}
