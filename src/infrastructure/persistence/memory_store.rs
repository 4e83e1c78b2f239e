//! In-process store for tests and local demos.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use crate::domain::entities::{Click, NewClick, PoolStatus, SlugRecord};
use crate::domain::errors::StoreError;
use crate::domain::repositories::{ClickRepository, SlugStore, SlugTransaction};
use crate::utils::db_error::TARGET_URL_CONSTRAINT;

#[derive(Debug, Clone, Default)]
struct MemoryState {
    slugs: Vec<SlugRecord>,
    clicks: Vec<Click>,
    next_click_id: i64,
}

impl MemoryState {
    fn slug_by_id(&self, id: i64) -> Option<&SlugRecord> {
        self.slugs.iter().find(|record| record.id == id)
    }
}

/// Slug store and click repository backed by process memory.
///
/// Nothing survives a restart. A transaction holds the state lock for its whole lifetime
/// and works on a private copy that replaces the shared state on commit, so writers are
/// fully serialized and an uncommitted transaction leaves no trace.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        debug!("Using in-memory store");
        Self::default()
    }
}

#[async_trait]
impl SlugStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn SlugTransaction>, StoreError> {
        let guard = self.state.clone().lock_owned().await;
        let draft = guard.clone();
        Ok(Box::new(MemoryTransaction { guard, draft }))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<SlugRecord>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.slugs.iter().find(|record| record.slug == slug).cloned())
    }

    async fn list_assigned(&self) -> Result<Vec<SlugRecord>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .slugs
            .iter()
            .filter(|record| record.is_active())
            .cloned()
            .collect())
    }

    async fn seed(&self, slugs: &[String]) -> Result<u64, StoreError> {
        let mut state = self.state.lock().await;
        let mut next_id = state.slugs.iter().map(|record| record.id).max().unwrap_or(0) + 1;
        let mut inserted = 0;

        for slug in slugs {
            if state.slugs.iter().any(|record| &record.slug == slug) {
                continue;
            }
            state.slugs.push(SlugRecord::new(next_id, slug.clone(), None));
            next_id += 1;
            inserted += 1;
        }

        Ok(inserted)
    }

    async fn pool_status(&self) -> Result<PoolStatus, StoreError> {
        let state = self.state.lock().await;
        let assigned = state.slugs.iter().filter(|record| record.is_active()).count();

        Ok(PoolStatus {
            total: state.slugs.len() as i64,
            assigned: assigned as i64,
        })
    }
}

#[async_trait]
impl ClickRepository for MemoryStore {
    async fn insert(&self, new_click: NewClick) -> Result<Option<Click>, StoreError> {
        let mut state = self.state.lock().await;

        let assigned = state
            .slug_by_id(new_click.slug_id)
            .is_some_and(SlugRecord::is_active);
        if !assigned {
            return Ok(None);
        }

        state.next_click_id += 1;
        let click = Click::new(
            state.next_click_id,
            new_click.slug_id,
            Utc::now(),
            new_click.origin_address,
        );
        state.clicks.push(click.clone());

        Ok(Some(click))
    }

    async fn list_by_slug_id(&self, slug_id: i64) -> Result<Vec<Click>, StoreError> {
        let state = self.state.lock().await;
        let mut clicks: Vec<Click> = state
            .clicks
            .iter()
            .filter(|click| click.slug_id == slug_id)
            .cloned()
            .collect();
        clicks.sort_by(|a, b| b.clicked_at.cmp(&a.clicked_at).then(b.id.cmp(&a.id)));

        Ok(clicks)
    }

    async fn count_by_slug_id(&self, slug_id: i64) -> Result<i64, StoreError> {
        let state = self.state.lock().await;
        let count = state
            .clicks
            .iter()
            .filter(|click| click.slug_id == slug_id)
            .count();

        Ok(count as i64)
    }

    async fn count_by_slug_ids(&self, slug_ids: &[i64]) -> Result<HashMap<i64, i64>, StoreError> {
        let state = self.state.lock().await;
        let mut counts = HashMap::new();

        for click in state.clicks.iter().filter(|c| slug_ids.contains(&c.slug_id)) {
            *counts.entry(click.slug_id).or_insert(0) += 1;
        }

        Ok(counts)
    }
}

/// Transaction over a [`MemoryStore`].
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    draft: MemoryState,
}

#[async_trait]
impl SlugTransaction for MemoryTransaction {
    async fn lock_by_slug(&mut self, slug: &str) -> Result<Option<SlugRecord>, StoreError> {
        Ok(self
            .draft
            .slugs
            .iter()
            .find(|record| record.slug == slug)
            .cloned())
    }

    async fn lock_first_unassigned(&mut self) -> Result<Option<SlugRecord>, StoreError> {
        Ok(self
            .draft
            .slugs
            .iter()
            .filter(|record| !record.is_active())
            .min_by_key(|record| record.id)
            .cloned())
    }

    async fn find_by_target_url(
        &mut self,
        target_url: &str,
    ) -> Result<Option<SlugRecord>, StoreError> {
        Ok(self
            .draft
            .slugs
            .iter()
            .find(|record| record.target_url.as_deref() == Some(target_url))
            .cloned())
    }

    async fn set_target_url(
        &mut self,
        id: i64,
        target_url: Option<&str>,
    ) -> Result<SlugRecord, StoreError> {
        if let Some(url) = target_url
            && self
                .draft
                .slugs
                .iter()
                .any(|record| record.id != id && record.target_url.as_deref() == Some(url))
        {
            return Err(StoreError::Conflict {
                constraint: TARGET_URL_CONSTRAINT.to_string(),
            });
        }

        let record = self
            .draft
            .slugs
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))?;
        record.target_url = target_url.map(str::to_string);

        Ok(record.clone())
    }

    async fn delete_clicks(&mut self, slug_id: i64) -> Result<u64, StoreError> {
        let before = self.draft.clicks.len();
        self.draft.clicks.retain(|click| click.slug_id != slug_id);

        Ok((before - self.draft.clicks.len()) as u64)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryTransaction { mut guard, draft } = *self;
        *guard = draft;
        Ok(())
    }
}
