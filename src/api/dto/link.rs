//! DTOs for link management endpoints.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::domain::entities::SlugRecord;

/// Shape of every pool slug: two lowercase words joined by a hyphen.
static SLUG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z]+-[a-z]+$").unwrap());

/// Request body for `POST /api/v1/links`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Specific slug to claim; the oldest free slug is used when absent.
    #[validate(regex(path = *SLUG_REGEX, message = "Slug must look like 'adjective-noun'"))]
    pub slug: Option<String>,

    #[validate(url(message = "Invalid URL format"))]
    #[validate(custom(function = "crate::utils::url::validate_target_url"))]
    pub target_url: String,
}

/// Request body for `PATCH /api/v1/links/{slug}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[validate(url(message = "Invalid URL format"))]
    #[validate(custom(function = "crate::utils::url::validate_target_url"))]
    pub target_url: String,
}

/// An active link with its click total.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkView {
    pub slug: String,
    pub target_url: String,
    pub clicks: i64,
}

impl LinkView {
    pub fn new(record: SlugRecord, clicks: i64) -> Self {
        Self {
            target_url: record.target_url.unwrap_or_default(),
            slug: record.slug,
            clicks,
        }
    }
}
