//! PostgreSQL implementation of the slug store.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use std::sync::Arc;

use crate::domain::entities::{PoolStatus, SlugRecord};
use crate::domain::errors::StoreError;
use crate::domain::repositories::{SlugStore, SlugTransaction};
use crate::utils::db_error::map_store_error;

#[derive(Debug, FromRow)]
struct SlugRow {
    id: i64,
    slug: String,
    target_url: Option<String>,
}

impl From<SlugRow> for SlugRecord {
    fn from(row: SlugRow) -> Self {
        SlugRecord::new(row.id, row.slug, row.target_url)
    }
}

/// PostgreSQL store for the slug pool.
///
/// Uniqueness of `slug` and of non-null `target_url` is enforced by the schema
/// (`slugs_slug_key`, `slugs_target_url_key`) in addition to the registry's checks.
pub struct PgSlugStore {
    pool: Arc<PgPool>,
}

impl PgSlugStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SlugStore for PgSlugStore {
    async fn begin(&self) -> Result<Box<dyn SlugTransaction>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgSlugTransaction { tx }))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<SlugRecord>, StoreError> {
        let row = sqlx::query_as::<_, SlugRow>(
            r#"
            SELECT id, slug, target_url
            FROM slugs
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(SlugRecord::from))
    }

    async fn list_assigned(&self) -> Result<Vec<SlugRecord>, StoreError> {
        let rows = sqlx::query_as::<_, SlugRow>(
            r#"
            SELECT id, slug, target_url
            FROM slugs
            WHERE target_url IS NOT NULL AND target_url <> ''
            ORDER BY id ASC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(SlugRecord::from).collect())
    }

    async fn seed(&self, slugs: &[String]) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO slugs (slug)
            SELECT s.slug
            FROM UNNEST($1::text[]) WITH ORDINALITY AS s(slug, ord)
            ORDER BY s.ord
            ON CONFLICT (slug) DO NOTHING
            "#,
        )
        .bind(slugs)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn pool_status(&self) -> Result<PoolStatus, StoreError> {
        let (total, assigned) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE target_url IS NOT NULL AND target_url <> '') AS assigned
            FROM slugs
            "#,
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(PoolStatus { total, assigned })
    }
}

/// A PostgreSQL transaction over the slug table.
///
/// Dropped without commit, the underlying SQLx transaction rolls back.
pub struct PgSlugTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl SlugTransaction for PgSlugTransaction {
    async fn lock_by_slug(&mut self, slug: &str) -> Result<Option<SlugRecord>, StoreError> {
        let row = sqlx::query_as::<_, SlugRow>(
            r#"
            SELECT id, slug, target_url
            FROM slugs
            WHERE slug = $1
            FOR UPDATE
            "#,
        )
        .bind(slug)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(SlugRecord::from))
    }

    async fn lock_first_unassigned(&mut self) -> Result<Option<SlugRecord>, StoreError> {
        // Rows locked by a concurrent assignment are skipped, never handed out twice.
        let row = sqlx::query_as::<_, SlugRow>(
            r#"
            SELECT id, slug, target_url
            FROM slugs
            WHERE target_url IS NULL OR target_url = ''
            ORDER BY id ASC
            LIMIT 1
            FOR UPDATE SKIP LOCKED
            "#,
        )
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(SlugRecord::from))
    }

    async fn find_by_target_url(
        &mut self,
        target_url: &str,
    ) -> Result<Option<SlugRecord>, StoreError> {
        // Held until commit or rollback.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(target_url)
            .execute(&mut *self.tx)
            .await?;

        let row = sqlx::query_as::<_, SlugRow>(
            r#"
            SELECT id, slug, target_url
            FROM slugs
            WHERE target_url = $1
            LIMIT 1
            "#,
        )
        .bind(target_url)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(SlugRecord::from))
    }

    async fn set_target_url(
        &mut self,
        id: i64,
        target_url: Option<&str>,
    ) -> Result<SlugRecord, StoreError> {
        let row = sqlx::query_as::<_, SlugRow>(
            r#"
            UPDATE slugs
            SET target_url = $2
            WHERE id = $1
            RETURNING id, slug, target_url
            "#,
        )
        .bind(id)
        .bind(target_url)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_store_error)?;

        Ok(row.into())
    }

    async fn delete_clicks(&mut self, slug_id: i64) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM clicks WHERE slug_id = $1")
            .bind(slug_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let PgSlugTransaction { tx } = *self;
        tx.commit().await?;
        Ok(())
    }
}
