//! Store traits for the slug pool.

use crate::domain::entities::{PoolStatus, SlugRecord};
use crate::domain::errors::StoreError;
use async_trait::async_trait;

/// Durable table of slug records.
///
/// Reads go straight to the store. Mutations go through a [`SlugTransaction`] obtained from
/// [`SlugStore::begin`], so that a uniqueness check and the write it guards are atomic with
/// respect to other writers.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgSlugStore`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryStore`] - In-process implementation
#[async_trait]
pub trait SlugStore: Send + Sync {
    /// Opens a transaction. Dropping it without [`SlugTransaction::commit`] rolls back.
    async fn begin(&self) -> Result<Box<dyn SlugTransaction>, StoreError>;

    /// Finds a record by its slug, assigned or not.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<SlugRecord>, StoreError>;

    /// Lists assigned records ordered by ascending id.
    async fn list_assigned(&self) -> Result<Vec<SlugRecord>, StoreError>;

    /// Inserts the given slugs as unassigned records, in order, skipping slugs that already
    /// exist.
    ///
    /// Returns the number of records actually inserted.
    async fn seed(&self, slugs: &[String]) -> Result<u64, StoreError>;

    /// Counts total and assigned records.
    async fn pool_status(&self) -> Result<PoolStatus, StoreError>;
}

/// A unit of work against the slug table.
///
/// Records returned by the `lock_*` methods stay locked against other transactions until
/// this one ends.
#[async_trait]
pub trait SlugTransaction: Send {
    /// Locks and returns the record with this slug.
    async fn lock_by_slug(&mut self, slug: &str) -> Result<Option<SlugRecord>, StoreError>;

    /// Locks and returns the unassigned record with the lowest id.
    async fn lock_first_unassigned(&mut self) -> Result<Option<SlugRecord>, StoreError>;

    /// Returns the assigned record currently holding `target_url`.
    ///
    /// Concurrent transactions checking the same URL are serialized from this point on.
    async fn find_by_target_url(
        &mut self,
        target_url: &str,
    ) -> Result<Option<SlugRecord>, StoreError>;

    /// Sets or clears the target URL of record `id` and returns the updated record.
    async fn set_target_url(
        &mut self,
        id: i64,
        target_url: Option<&str>,
    ) -> Result<SlugRecord, StoreError>;

    /// Deletes every click owned by record `slug_id`, returning how many were removed.
    async fn delete_clicks(&mut self, slug_id: i64) -> Result<u64, StoreError>;

    /// Makes all changes of this transaction visible.
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
