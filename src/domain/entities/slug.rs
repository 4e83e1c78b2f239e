//! Slug record entity: one slot of the fixed slug pool.

/// One slot in the fixed slug universe.
///
/// A record is created once when the pool is seeded and is never deleted or renamed.
/// Only `target_url` changes over its lifetime: set on assignment, cleared on release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugRecord {
    pub id: i64,
    pub slug: String,
    pub target_url: Option<String>,
}

impl SlugRecord {
    /// Creates a new SlugRecord instance.
    pub fn new(id: i64, slug: String, target_url: Option<String>) -> Self {
        Self {
            id,
            slug,
            target_url,
        }
    }

    /// Returns true if the slug currently redirects somewhere.
    ///
    /// An empty target is treated the same as no target.
    pub fn is_active(&self) -> bool {
        self.target_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    /// Returns the target URL of an active record, `None` for a free one.
    pub fn active_target(&self) -> Option<&str> {
        self.target_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Occupancy of the slug pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub total: i64,
    pub assigned: i64,
}

impl PoolStatus {
    /// Number of slugs that can still be handed out.
    pub fn available(&self) -> i64 {
        self.total - self.assigned
    }
}
