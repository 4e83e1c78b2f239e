//! Repository trait for click records.

use crate::domain::entities::{Click, NewClick};
use crate::domain::errors::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;

/// Repository interface for a slug's traffic log.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Inserts a click stamped with the current time.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Click))` if the owning slug is still assigned
    /// - `Ok(None)` if the slug was released in the meantime; nothing is written
    async fn insert(&self, new_click: NewClick) -> Result<Option<Click>, StoreError>;

    /// Lists the clicks of one slug, most recent first.
    async fn list_by_slug_id(&self, slug_id: i64) -> Result<Vec<Click>, StoreError>;

    /// Counts the clicks of one slug.
    async fn count_by_slug_id(&self, slug_id: i64) -> Result<i64, StoreError>;

    /// Counts clicks for several slugs at once.
    ///
    /// Slugs without clicks may be missing from the returned map.
    async fn count_by_slug_ids(&self, slug_ids: &[i64]) -> Result<HashMap<i64, i64>, StoreError>;
}
