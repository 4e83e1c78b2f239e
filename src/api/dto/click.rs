//! DTOs for click history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::Click;

/// One recorded visit, as returned by `GET /api/v1/links/{slug}/clicks`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClickView {
    pub timestamp: DateTime<Utc>,
    pub origin_address: String,
}

impl From<Click> for ClickView {
    fn from(click: Click) -> Self {
        Self {
            timestamp: click.clicked_at,
            origin_address: click.origin_address,
        }
    }
}
