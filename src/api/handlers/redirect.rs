//! Handlers for public redirects.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use serde_json::json;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_origin::ClientOrigin;

/// Redirects a slug to its target URL and records the visit.
///
/// # Endpoint
///
/// `GET /{slug}`
///
/// # Request Flow
///
/// 1. Resolve the slug to its active record
/// 2. Record a click with the caller's origin address
/// 3. Return 307 Temporary Redirect
///
/// The click is stored before the response is sent, so the history is complete as soon
/// as the client sees the redirect.
///
/// # Errors
///
/// Returns 404 Not Found if the slug is unknown, free, or released mid-request.
pub async fn redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    ClientOrigin(origin): ClientOrigin,
) -> Result<impl IntoResponse, AppError> {
    let link = state.link_registry.resolve(&slug).await?;
    state.click_recorder.record_for(&link, &origin).await?;

    let target = link.target_url.unwrap_or_default();
    metrics::counter!("linker_redirects_total").increment(1);
    debug!(slug = %slug, target = %target, "Redirecting");

    Ok(Redirect::temporary(&target))
}

/// Redirects the bare root to the configured landing page.
///
/// # Endpoint
///
/// `GET /`
///
/// # Errors
///
/// Returns 404 Not Found when no root redirect is configured.
pub async fn root_handler(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    match state.root_redirect.as_deref() {
        Some(target) => Ok(Redirect::temporary(target)),
        None => Err(AppError::not_found("Nothing here", json!({}))),
    }
}
