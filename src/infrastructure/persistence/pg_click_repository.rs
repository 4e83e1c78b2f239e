//! PostgreSQL implementation of the click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{Click, NewClick};
use crate::domain::errors::StoreError;
use crate::domain::repositories::ClickRepository;

#[derive(Debug, FromRow)]
struct ClickRow {
    id: i64,
    slug_id: i64,
    clicked_at: DateTime<Utc>,
    origin_address: String,
}

impl From<ClickRow> for Click {
    fn from(row: ClickRow) -> Self {
        Click::new(row.id, row.slug_id, row.clicked_at, row.origin_address)
    }
}

/// PostgreSQL repository for click records.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn insert(&self, new_click: NewClick) -> Result<Option<Click>, StoreError> {
        // FOR SHARE waits for an in-flight release and then re-checks the assignment.
        let row = sqlx::query_as::<_, ClickRow>(
            r#"
            INSERT INTO clicks (slug_id, origin_address)
            SELECT s.id, $2
            FROM slugs s
            WHERE s.id = $1
              AND s.target_url IS NOT NULL
              AND s.target_url <> ''
            FOR SHARE
            RETURNING id, slug_id, clicked_at, origin_address
            "#,
        )
        .bind(new_click.slug_id)
        .bind(new_click.origin_address)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Click::from))
    }

    async fn list_by_slug_id(&self, slug_id: i64) -> Result<Vec<Click>, StoreError> {
        let rows = sqlx::query_as::<_, ClickRow>(
            r#"
            SELECT id, slug_id, clicked_at, origin_address
            FROM clicks
            WHERE slug_id = $1
            ORDER BY clicked_at DESC, id DESC
            "#,
        )
        .bind(slug_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Click::from).collect())
    }

    async fn count_by_slug_id(&self, slug_id: i64) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clicks WHERE slug_id = $1")
            .bind(slug_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn count_by_slug_ids(&self, slug_ids: &[i64]) -> Result<HashMap<i64, i64>, StoreError> {
        if slug_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT slug_id, COUNT(*)
            FROM clicks
            WHERE slug_id = ANY($1)
            GROUP BY slug_id
            "#,
        )
        .bind(slug_ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().collect())
    }
}
