//! Click recording and history.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::application::services::LinkRegistry;
use crate::domain::entities::{Click, NewClick, SlugRecord};
use crate::domain::errors::LinkError;
use crate::domain::repositories::ClickRepository;

/// Records visits to active slugs and serves their history.
///
/// A click is only ever stored against a slug that is active at insert time, so a click
/// racing a release is refused rather than orphaned.
pub struct ClickRecorder {
    registry: Arc<LinkRegistry>,
    clicks: Arc<dyn ClickRepository>,
}

impl ClickRecorder {
    /// Creates a recorder resolving slugs through `registry` and storing into `clicks`.
    pub fn new(registry: Arc<LinkRegistry>, clicks: Arc<dyn ClickRepository>) -> Self {
        Self { registry, clicks }
    }

    /// Resolves `slug` and records a visit from `origin_address`.
    ///
    /// # Errors
    ///
    /// [`LinkError::InvalidSlug`] or [`LinkError::SlugNotInUse`] as for
    /// [`LinkRegistry::resolve`].
    pub async fn record(&self, slug: &str, origin_address: &str) -> Result<Click, LinkError> {
        let link = self.registry.resolve(slug).await?;
        self.record_for(&link, origin_address).await
    }

    /// Records a visit to an already resolved record.
    ///
    /// Fails with [`LinkError::SlugNotInUse`] if the slug was released in the meantime.
    pub async fn record_for(
        &self,
        link: &SlugRecord,
        origin_address: &str,
    ) -> Result<Click, LinkError> {
        let click = self
            .clicks
            .insert(NewClick::new(link.id, origin_address))
            .await?
            .ok_or_else(|| LinkError::not_in_use(&link.slug))?;

        metrics::counter!("linker_clicks_recorded_total").increment(1);
        debug!(slug = %link.slug, origin = %click.origin_address, "Click recorded");

        Ok(click)
    }

    /// Lists clicks on an active slug, newest first.
    pub async fn list_for(&self, slug: &str) -> Result<Vec<Click>, LinkError> {
        let link = self.registry.resolve(slug).await?;
        Ok(self.clicks.list_by_slug_id(link.id).await?)
    }

    /// Counts the clicks stored for `link`.
    pub async fn count_for(&self, link: &SlugRecord) -> Result<i64, LinkError> {
        Ok(self.clicks.count_by_slug_id(link.id).await?)
    }

    /// Click totals keyed by slug id. Records without clicks are absent from the map.
    pub async fn counts_for(&self, links: &[SlugRecord]) -> Result<HashMap<i64, i64>, LinkError> {
        let ids: Vec<i64> = links.iter().map(|link| link.id).collect();
        Ok(self.clicks.count_by_slug_ids(&ids).await?)
    }
}
