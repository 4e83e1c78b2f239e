//! Handler for click history.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::click::ClickView;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the clicks recorded for an active slug, newest first.
///
/// # Endpoint
///
/// `GET /api/v1/links/{slug}/clicks`
///
/// # Response
///
/// ```json
/// [
///   { "timestamp": "2025-01-01T12:00:00Z", "origin_address": "203.0.113.7" }
/// ]
/// ```
///
/// # Errors
///
/// 404 if the slug is unknown or not in use.
pub async fn list_clicks_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ClickView>>, AppError> {
    let clicks = state.click_recorder.list_for(&slug).await?;

    Ok(Json(clicks.into_iter().map(ClickView::from).collect()))
}
