//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`        - Redirect to the configured landing page (public)
//! - `GET  /{slug}`  - Slug redirect, records a click (public)
//! - `GET  /health`  - Store connectivity and pool occupancy (public)
//! - `/api/v1/*`     - REST API (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Authentication** - Bearer token on `/api`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler, root_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::config::Config;
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the routes with authentication but without rate limiting or tracing.
///
/// Integration tests drive this router directly.
pub fn build_router(state: AppState) -> Router {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/{slug}", get(redirect_handler))
        .nest("/api", api_router)
        .with_state(state)
}

/// Constructs the production router with all routes and middleware.
///
/// # Errors
///
/// Fails if the configured rate limit cannot be built.
pub fn app_router(state: AppState, config: &Config) -> anyhow::Result<NormalizePath<Router>> {
    let limiter = rate_limit::layer(
        config.rate_limit_period_ms,
        config.rate_limit_burst,
        config.behind_proxy,
    )
    .ok_or_else(|| anyhow::anyhow!("Invalid rate limit configuration"))?;

    let router = build_router(state)
        .layer(limiter)
        .layer(tracing::layer());

    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}
