//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    create_link_handler, delete_link_handler, get_link_handler, list_clicks_handler,
    list_links_handler, update_link_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET    /v1/links`                - List active links
/// - `POST   /v1/links`                - Assign a target URL to a slug
/// - `GET    /v1/links/{slug}`         - Show one active link
/// - `PATCH  /v1/links/{slug}`         - Retarget an active link
/// - `DELETE /v1/links/{slug}`         - Release a slug
/// - `GET    /v1/links/{slug}/clicks`  - Click history, newest first
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/links",
            get(list_links_handler).post(create_link_handler),
        )
        .route(
            "/v1/links/{slug}",
            get(get_link_handler)
                .patch(update_link_handler)
                .delete(delete_link_handler),
        )
        .route("/v1/links/{slug}/clicks", get(list_clicks_handler))
}
