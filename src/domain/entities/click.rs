//! Click entity representing a single visit to an active slug.

use chrono::{DateTime, Utc};

/// Origin recorded when the caller's address cannot be determined.
pub const UNKNOWN_ORIGIN: &str = "unknown";

/// A visit recorded when a slug's redirect endpoint is hit.
///
/// Owned by exactly one slug record; releasing the slug deletes all of its clicks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Click {
    pub id: i64,
    pub slug_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub origin_address: String,
}

impl Click {
    /// Creates a new Click instance.
    pub fn new(id: i64, slug_id: i64, clicked_at: DateTime<Utc>, origin_address: String) -> Self {
        Self {
            id,
            slug_id,
            clicked_at,
            origin_address,
        }
    }
}

/// Input data for recording a new click.
///
/// The timestamp is assigned by the store at insert time.
#[derive(Debug, Clone)]
pub struct NewClick {
    pub slug_id: i64,
    pub origin_address: String,
}

impl NewClick {
    /// Builds a click for `slug_id`, falling back to [`UNKNOWN_ORIGIN`] for a blank origin.
    pub fn new(slug_id: i64, origin_address: impl Into<String>) -> Self {
        let origin_address = origin_address.into();
        let origin_address = if origin_address.trim().is_empty() {
            UNKNOWN_ORIGIN.to_string()
        } else {
            origin_address
        };

        Self {
            slug_id,
            origin_address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_creation() {
        let now = Utc::now();
        let click = Click::new(1, 42, now, "1.2.3.4".to_string());

        assert_eq!(click.id, 1);
        assert_eq!(click.slug_id, 42);
        assert_eq!(click.clicked_at, now);
        assert_eq!(click.origin_address, "1.2.3.4");
    }

    #[test]
    fn test_new_click_keeps_origin() {
        let new_click = NewClick::new(7, "10.0.0.1");

        assert_eq!(new_click.slug_id, 7);
        assert_eq!(new_click.origin_address, "10.0.0.1");
    }

    #[test]
    fn test_new_click_blank_origin_uses_sentinel() {
        let new_click = NewClick::new(7, "  ");

        assert_eq!(new_click.origin_address, UNKNOWN_ORIGIN);
    }
}
