//! Handlers for link management endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, LinkView, UpdateLinkRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Assigns a target URL to a slug.
///
/// # Endpoint
///
/// `POST /api/v1/links`
///
/// # Request Body
///
/// ```json
/// {
///   "slug": "bored-bulbasaur",      // optional
///   "target_url": "https://example.com"
/// }
/// ```
///
/// Without `slug` the oldest free slug of the pool is handed out.
///
/// # Errors
///
/// Every refusal is 422: invalid input, unknown or busy slug, duplicate target URL and an
/// exhausted pool alike.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<Json<LinkView>, AppError> {
    payload.validate()?;

    let record = state
        .link_registry
        .assign(payload.slug.as_deref(), &payload.target_url)
        .await
        .map_err(AppError::unprocessable)?;

    Ok(Json(LinkView::new(record, 0)))
}

/// Lists all active links with their click totals.
///
/// # Endpoint
///
/// `GET /api/v1/links`
pub async fn list_links_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<LinkView>>, AppError> {
    let records = state.link_registry.list_active().await?;
    let counts = state.click_recorder.counts_for(&records).await?;

    let views = records
        .into_iter()
        .map(|record| {
            let clicks = counts.get(&record.id).copied().unwrap_or(0);
            LinkView::new(record, clicks)
        })
        .collect();

    Ok(Json(views))
}

/// Returns one active link.
///
/// # Endpoint
///
/// `GET /api/v1/links/{slug}`
///
/// # Errors
///
/// 404 if the slug is unknown or not in use.
pub async fn get_link_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkView>, AppError> {
    let record = state.link_registry.resolve(&slug).await?;
    let clicks = state.click_recorder.count_for(&record).await?;

    Ok(Json(LinkView::new(record, clicks)))
}

/// Points an active slug at a new URL.
///
/// # Endpoint
///
/// `PATCH /api/v1/links/{slug}`
///
/// # Request Body
///
/// ```json
/// { "target_url": "https://new-destination.com" }
/// ```
///
/// Submitting the URL the slug already has is accepted.
///
/// # Errors
///
/// - 404 if the slug is unknown or not in use
/// - 422 if the URL is invalid or held by another slug
pub async fn update_link_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkView>, AppError> {
    payload.validate()?;

    let record = state
        .link_registry
        .update(&slug, &payload.target_url)
        .await?;
    let clicks = state.click_recorder.count_for(&record).await?;

    Ok(Json(LinkView::new(record, clicks)))
}

/// Releases a slug back to the pool, deleting its click history.
///
/// # Endpoint
///
/// `DELETE /api/v1/links/{slug}`
///
/// # Errors
///
/// 404 if the slug is not part of the pool or is not in use.
pub async fn delete_link_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.link_registry.resolve(&slug).await?;
    state.link_registry.release(&slug).await?;

    Ok(StatusCode::NO_CONTENT)
}
