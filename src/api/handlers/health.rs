//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse, PoolView};
use crate::state::AppState;

/// Returns service health with store connectivity and pool occupancy.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Store reachable
/// - **503 Service Unavailable**: Store unreachable
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "store": { "status": "ok" },
///     "pool": { "total": 1500, "assigned": 12, "available": 1488 }
///   }
/// }
/// ```
///
/// A pool with no free slug is reported as a warning but still counts as healthy.
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let (store, pool) = match state.link_registry.pool_status().await {
        Ok(status) => {
            let message = (status.available() == 0).then(|| "Slug pool exhausted".to_string());
            let check = CheckStatus {
                status: if message.is_some() { "warning" } else { "ok" }.to_string(),
                message,
            };
            let pool = PoolView {
                total: status.total,
                assigned: status.assigned,
                available: status.available(),
            };
            (check, Some(pool))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            let check = CheckStatus {
                status: "error".to_string(),
                message: Some("Store unreachable".to_string()),
            };
            (check, None)
        }
    };

    let healthy = pool.is_some();
    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks { store, pool },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
