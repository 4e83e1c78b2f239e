//! Slug assignment, resolution, retargeting and release.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::entities::{PoolStatus, SlugRecord};
use crate::domain::errors::{LinkError, StoreError};
use crate::domain::repositories::SlugStore;
use crate::utils::db_error::is_target_url_conflict;

/// Registry of slug-to-URL assignments over a fixed slug pool.
///
/// Owns the allocation policy: system-directed assignment always hands out the unassigned
/// record with the smallest id, and every mutation runs inside one store transaction so
/// that concurrent callers never observe or produce a partial state.
///
/// # Invariants
///
/// - at most one active record per target URL
/// - a released slug keeps no target and no clicks
/// - records are never created or deleted here, only retargeted
pub struct LinkRegistry {
    store: Arc<dyn SlugStore>,
}

impl LinkRegistry {
    /// Creates a new registry over `store`.
    pub fn new(store: Arc<dyn SlugStore>) -> Self {
        Self { store }
    }

    /// Assigns `target_url` to a slug.
    ///
    /// With `slug` set the named slug is used, otherwise the oldest free one. The target URL
    /// is checked first, so a duplicate URL is reported even when the named slug is also
    /// invalid or taken.
    ///
    /// # Errors
    ///
    /// - [`LinkError::TargetUrlAlreadyExists`] if an active slug already points to the URL
    /// - [`LinkError::InvalidSlug`] if the named slug is not in the pool
    /// - [`LinkError::SlugAlreadyInUse`] if the named slug is active
    /// - [`LinkError::NoAvailableSlugs`] if the pool is exhausted
    pub async fn assign(
        &self,
        slug: Option<&str>,
        target_url: &str,
    ) -> Result<SlugRecord, LinkError> {
        let mut tx = self.store.begin().await?;

        if let Some(holder) = tx.find_by_target_url(target_url).await? {
            return Err(target_url_taken(target_url, holder));
        }

        let record = match slug {
            Some(slug) => {
                let record = tx
                    .lock_by_slug(slug)
                    .await?
                    .ok_or_else(|| LinkError::invalid_slug(slug))?;

                if let Some(current) = record.active_target() {
                    return Err(LinkError::SlugAlreadyInUse {
                        slug: record.slug.clone(),
                        target_url: current.to_string(),
                    });
                }
                record
            }
            None => tx
                .lock_first_unassigned()
                .await?
                .ok_or(LinkError::NoAvailableSlugs)?,
        };

        let assigned = match tx.set_target_url(record.id, Some(target_url)).await {
            Ok(assigned) => assigned,
            Err(e) => {
                drop(tx);
                return Err(self.explain_write_failure(e, target_url).await);
            }
        };
        tx.commit().await?;

        metrics::counter!("linker_links_assigned_total").increment(1);
        info!(slug = %assigned.slug, target_url, "Link assigned");

        Ok(assigned)
    }

    /// Returns the active record behind `slug`.
    ///
    /// # Errors
    ///
    /// [`LinkError::InvalidSlug`] for an unknown slug, [`LinkError::SlugNotInUse`] for a
    /// free one.
    pub async fn resolve(&self, slug: &str) -> Result<SlugRecord, LinkError> {
        let record = self
            .store
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| LinkError::invalid_slug(slug))?;

        if !record.is_active() {
            return Err(LinkError::not_in_use(slug));
        }

        Ok(record)
    }

    /// Points an active slug at a new target URL.
    ///
    /// Re-submitting the slug's current URL succeeds without change.
    pub async fn update(&self, slug: &str, target_url: &str) -> Result<SlugRecord, LinkError> {
        let mut tx = self.store.begin().await?;

        // URL lock before row lock, in the same order as `assign`.
        let holder = tx.find_by_target_url(target_url).await?;

        let record = tx
            .lock_by_slug(slug)
            .await?
            .ok_or_else(|| LinkError::invalid_slug(slug))?;
        if !record.is_active() {
            return Err(LinkError::not_in_use(slug));
        }

        if let Some(holder) = holder
            && holder.id != record.id
        {
            return Err(target_url_taken(target_url, holder));
        }

        let updated = match tx.set_target_url(record.id, Some(target_url)).await {
            Ok(updated) => updated,
            Err(e) => {
                drop(tx);
                return Err(self.explain_write_failure(e, target_url).await);
            }
        };
        tx.commit().await?;

        info!(slug, target_url, "Link retargeted");

        Ok(updated)
    }

    /// Returns `slug` to the pool and deletes its click history.
    ///
    /// Releasing a slug that is already free is a no-op.
    ///
    /// # Errors
    ///
    /// [`LinkError::InvalidSlug`] if the slug is not in the pool.
    pub async fn release(&self, slug: &str) -> Result<(), LinkError> {
        let mut tx = self.store.begin().await?;

        let record = tx
            .lock_by_slug(slug)
            .await?
            .ok_or_else(|| LinkError::invalid_slug(slug))?;
        if !record.is_active() {
            debug!(slug, "Release of unassigned slug ignored");
            return Ok(());
        }

        let clicks_removed = tx.delete_clicks(record.id).await?;
        tx.set_target_url(record.id, None).await?;
        tx.commit().await?;

        metrics::counter!("linker_links_released_total").increment(1);
        info!(slug, clicks_removed, "Link released");

        Ok(())
    }

    /// Lists all active records in ascending id order.
    pub async fn list_active(&self) -> Result<Vec<SlugRecord>, LinkError> {
        Ok(self.store.list_assigned().await?)
    }

    /// Counts total and assigned records in the pool.
    pub async fn pool_status(&self) -> Result<PoolStatus, LinkError> {
        Ok(self.store.pool_status().await?)
    }

    /// Inserts the given slugs as free records, skipping existing ones.
    ///
    /// Returns the number of records created. Order of `slugs` becomes allocation order.
    pub async fn seed_pool(&self, slugs: &[String]) -> Result<u64, LinkError> {
        let inserted = self.store.seed(slugs).await?;
        if inserted > 0 {
            info!(inserted, "Slug pool seeded");
        }
        Ok(inserted)
    }

    /// Turns a failed write into the error the caller should see.
    ///
    /// A target-URL uniqueness violation means a concurrent assignment won the race; the
    /// winner is looked up in a fresh transaction so the error can name its slug.
    async fn explain_write_failure(&self, err: StoreError, target_url: &str) -> LinkError {
        if !is_target_url_conflict(&err) {
            return err.into();
        }

        let holder = match self.store.begin().await {
            Ok(mut tx) => tx.find_by_target_url(target_url).await,
            Err(e) => Err(e),
        };

        match holder {
            Ok(Some(holder)) => target_url_taken(target_url, holder),
            Ok(None) => err.into(),
            Err(e) => e.into(),
        }
    }
}

fn target_url_taken(target_url: &str, holder: SlugRecord) -> LinkError {
    LinkError::TargetUrlAlreadyExists {
        target_url: target_url.to_string(),
        slug: holder.slug,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::MemoryStore;

    const POOL: [&str; 4] = ["a", "b", "c", "d"];

    async fn registry_with_pool() -> (LinkRegistry, MemoryStore) {
        let store = MemoryStore::new();
        let slugs: Vec<String> = POOL.iter().map(|s| s.to_string()).collect();
        store.seed(&slugs).await.unwrap();

        (LinkRegistry::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn test_assign_picks_oldest_free_slug() {
        let (registry, _) = registry_with_pool().await;

        let first = registry.assign(None, "https://one.example").await.unwrap();
        let second = registry.assign(None, "https://two.example").await.unwrap();

        assert_eq!(first.slug, "a");
        assert_eq!(second.slug, "b");
    }

    #[tokio::test]
    async fn test_assign_named_slug() {
        let (registry, _) = registry_with_pool().await;

        let record = registry
            .assign(Some("c"), "https://x.example")
            .await
            .unwrap();

        assert_eq!(record.slug, "c");
        assert_eq!(record.target_url.as_deref(), Some("https://x.example"));

        // Allocation order skips the named slug.
        let next = registry.assign(None, "https://y.example").await.unwrap();
        assert_eq!(next.slug, "a");
    }

    #[tokio::test]
    async fn test_assign_unknown_slug() {
        let (registry, _) = registry_with_pool().await;

        let result = registry.assign(Some("zzz"), "https://x.example").await;

        assert!(matches!(result, Err(LinkError::InvalidSlug { slug }) if slug == "zzz"));
    }

    #[tokio::test]
    async fn test_assign_active_slug() {
        let (registry, _) = registry_with_pool().await;
        registry
            .assign(Some("a"), "https://x.example")
            .await
            .unwrap();

        let result = registry.assign(Some("a"), "https://y.example").await;

        assert!(matches!(
            result,
            Err(LinkError::SlugAlreadyInUse { slug, target_url })
                if slug == "a" && target_url == "https://x.example"
        ));
    }

    #[tokio::test]
    async fn test_assign_duplicate_url_names_holder() {
        let (registry, _) = registry_with_pool().await;
        registry.assign(None, "https://x.example").await.unwrap();

        let result = registry.assign(None, "https://x.example").await;

        assert!(matches!(
            result,
            Err(LinkError::TargetUrlAlreadyExists { slug, .. }) if slug == "a"
        ));
    }

    #[tokio::test]
    async fn test_duplicate_url_wins_over_slug_errors() {
        let (registry, _) = registry_with_pool().await;
        registry
            .assign(Some("a"), "https://x.example")
            .await
            .unwrap();

        let unknown = registry.assign(Some("zzz"), "https://x.example").await;
        let taken = registry.assign(Some("a"), "https://x.example").await;

        assert!(matches!(
            unknown,
            Err(LinkError::TargetUrlAlreadyExists { .. })
        ));
        assert!(matches!(taken, Err(LinkError::TargetUrlAlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_pool_exhaustion() {
        let (registry, _) = registry_with_pool().await;
        for i in 0..POOL.len() {
            registry
                .assign(None, &format!("https://{i}.example"))
                .await
                .unwrap();
        }

        let result = registry.assign(None, "https://more.example").await;

        assert!(matches!(result, Err(LinkError::NoAvailableSlugs)));
        assert_eq!(registry.pool_status().await.unwrap().available(), 0);
    }

    #[tokio::test]
    async fn test_failed_assign_changes_nothing() {
        let (registry, store) = registry_with_pool().await;
        registry
            .assign(Some("b"), "https://x.example")
            .await
            .unwrap();

        let _ = registry.assign(Some("b"), "https://y.example").await;
        let _ = registry.assign(Some("zzz"), "https://y.example").await;

        let status = store.pool_status().await.unwrap();
        assert_eq!(status.assigned, 1);
        assert!(
            registry
                .list_active()
                .await
                .unwrap()
                .iter()
                .all(|r| r.target_url.as_deref() != Some("https://y.example"))
        );
    }

    #[tokio::test]
    async fn test_resolve() {
        let (registry, _) = registry_with_pool().await;
        registry
            .assign(Some("b"), "https://x.example")
            .await
            .unwrap();

        let record = registry.resolve("b").await.unwrap();
        assert_eq!(record.target_url.as_deref(), Some("https://x.example"));

        assert!(matches!(
            registry.resolve("a").await,
            Err(LinkError::SlugNotInUse { .. })
        ));
        assert!(matches!(
            registry.resolve("zzz").await,
            Err(LinkError::InvalidSlug { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_retargets() {
        let (registry, _) = registry_with_pool().await;
        registry
            .assign(Some("a"), "https://old.example")
            .await
            .unwrap();

        let updated = registry.update("a", "https://new.example").await.unwrap();

        assert_eq!(updated.target_url.as_deref(), Some("https://new.example"));
        assert_eq!(
            registry.resolve("a").await.unwrap().target_url.as_deref(),
            Some("https://new.example")
        );
    }

    #[tokio::test]
    async fn test_update_to_same_url_is_accepted() {
        let (registry, _) = registry_with_pool().await;
        registry
            .assign(Some("a"), "https://x.example")
            .await
            .unwrap();

        let updated = registry.update("a", "https://x.example").await.unwrap();

        assert_eq!(updated.slug, "a");
    }

    #[tokio::test]
    async fn test_update_rejects_url_of_other_slug() {
        let (registry, _) = registry_with_pool().await;
        registry
            .assign(Some("a"), "https://x.example")
            .await
            .unwrap();
        registry
            .assign(Some("b"), "https://y.example")
            .await
            .unwrap();

        let result = registry.update("b", "https://x.example").await;

        assert!(matches!(
            result,
            Err(LinkError::TargetUrlAlreadyExists { slug, .. }) if slug == "a"
        ));
    }

    #[tokio::test]
    async fn test_update_requires_active_slug() {
        let (registry, _) = registry_with_pool().await;

        assert!(matches!(
            registry.update("a", "https://x.example").await,
            Err(LinkError::SlugNotInUse { .. })
        ));
        assert!(matches!(
            registry.update("zzz", "https://x.example").await,
            Err(LinkError::InvalidSlug { .. })
        ));
    }

    #[tokio::test]
    async fn test_release_frees_slug_for_reuse() {
        let (registry, _) = registry_with_pool().await;
        registry.assign(None, "https://x.example").await.unwrap();
        registry.assign(None, "https://y.example").await.unwrap();

        registry.release("a").await.unwrap();

        assert!(matches!(
            registry.resolve("a").await,
            Err(LinkError::SlugNotInUse { .. })
        ));
        // The released slug is the oldest free one again.
        let next = registry.assign(None, "https://z.example").await.unwrap();
        assert_eq!(next.slug, "a");
        // And its old URL may be assigned anew.
        let again = registry.assign(None, "https://x.example").await.unwrap();
        assert_eq!(again.slug, "c");
    }

    #[tokio::test]
    async fn test_release_is_idempotent() {
        let (registry, _) = registry_with_pool().await;
        registry
            .assign(Some("a"), "https://x.example")
            .await
            .unwrap();

        registry.release("a").await.unwrap();
        registry.release("a").await.unwrap();

        assert_eq!(registry.pool_status().await.unwrap().assigned, 0);
    }

    #[tokio::test]
    async fn test_release_unknown_slug() {
        let (registry, _) = registry_with_pool().await;

        assert!(matches!(
            registry.release("zzz").await,
            Err(LinkError::InvalidSlug { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_active_in_id_order() {
        let (registry, _) = registry_with_pool().await;
        registry
            .assign(Some("c"), "https://c.example")
            .await
            .unwrap();
        registry
            .assign(Some("a"), "https://a.example")
            .await
            .unwrap();

        let slugs: Vec<String> = registry
            .list_active()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.slug)
            .collect();

        assert_eq!(slugs, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_seed_pool_skips_existing() {
        let (registry, _) = registry_with_pool().await;

        let inserted = registry
            .seed_pool(&["d".to_string(), "e".to_string()])
            .await
            .unwrap();

        assert_eq!(inserted, 1);
        assert_eq!(registry.pool_status().await.unwrap().total, 5);
    }

    #[tokio::test]
    async fn test_pool_size_never_changes() {
        let (registry, store) = registry_with_pool().await;
        let total = store.pool_status().await.unwrap().total;

        registry.assign(None, "https://a.example").await.unwrap();
        registry
            .assign(Some("c"), "https://c.example")
            .await
            .unwrap();
        let _ = registry.assign(Some("c"), "https://other.example").await;
        let _ = registry.assign(Some("zzz"), "https://other.example").await;
        registry.update("a", "https://a2.example").await.unwrap();
        registry.release("c").await.unwrap();
        registry.release("c").await.unwrap();
        registry.assign(None, "https://b.example").await.unwrap();

        let status = store.pool_status().await.unwrap();
        assert_eq!(status.total, total);
        assert_eq!(status.assigned, 2);
        assert_eq!(status.available(), total - 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_assignments_get_distinct_slugs() {
        let (registry, _) = registry_with_pool().await;
        let registry = Arc::new(registry);

        let handles: Vec<_> = (0..POOL.len())
            .map(|i| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    registry
                        .assign(None, &format!("https://{i}.example"))
                        .await
                })
            })
            .collect();

        let mut slugs = Vec::new();
        for handle in handles {
            slugs.push(handle.await.unwrap().unwrap().slug);
        }
        slugs.sort();

        assert_eq!(slugs, vec!["a", "b", "c", "d"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_same_url_assigned_once() {
        let (registry, _) = registry_with_pool().await;
        let registry = Arc::new(registry);

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let registry = registry.clone();
                tokio::spawn(async move { registry.assign(None, "https://same.example").await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(LinkError::TargetUrlAlreadyExists { .. }) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(registry.pool_status().await.unwrap().assigned, 1);
    }
}
