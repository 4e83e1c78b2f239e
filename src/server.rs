//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, database connection, pool seeding, and the Axum server lifecycle.

use crate::application::services::{AuthService, ClickRecorder, LinkRegistry};
use crate::config::{Config, StoreBackend};
use crate::domain::repositories::{ClickRepository, SlugStore};
use crate::domain::slug_pool;
use crate::infrastructure::persistence::{MemoryStore, PgClickRepository, PgSlugStore};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - The slug store (PostgreSQL with migrations, or in-memory)
/// - The slug pool, seeded if missing
/// - Link registry, click recorder and authentication services
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Seeding the pool fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let (slugs, clicks): (Arc<dyn SlugStore>, Arc<dyn ClickRepository>) =
        match config.store_backend {
            StoreBackend::Postgres => {
                let pool = Arc::new(connect_with_retry(&config).await?);
                tracing::info!("Connected to database");

                sqlx::migrate!("./migrations")
                    .run(pool.as_ref())
                    .await
                    .context("Failed to run migrations")?;
                tracing::info!("Migrations applied");

                let slugs: Arc<dyn SlugStore> = Arc::new(PgSlugStore::new(pool.clone()));
                let clicks: Arc<dyn ClickRepository> = Arc::new(PgClickRepository::new(pool));
                (slugs, clicks)
            }
            StoreBackend::Memory => {
                let store = MemoryStore::new();
                let slugs: Arc<dyn SlugStore> = Arc::new(store.clone());
                let clicks: Arc<dyn ClickRepository> = Arc::new(store);
                (slugs, clicks)
            }
        };

    let link_registry = Arc::new(LinkRegistry::new(slugs));
    link_registry
        .seed_pool(&slug_pool::generate())
        .await
        .context("Failed to seed slug pool")?;

    let status = link_registry.pool_status().await?;
    tracing::info!(
        total = status.total,
        assigned = status.assigned,
        available = status.available(),
        "Slug pool ready"
    );

    let click_recorder = Arc::new(ClickRecorder::new(link_registry.clone(), clicks));
    let auth_service =
        Arc::new(AuthService::new(&config.token).context("Failed to initialize authentication")?);

    let state = AppState {
        link_registry,
        click_recorder,
        auth_service,
        trust_forwarded_for: config.behind_proxy,
        root_redirect: config.root_redirect_url.clone(),
    };

    let app = app_router(state, &config)?;

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Connects to PostgreSQL, retrying with exponential backoff.
async fn connect_with_retry(config: &Config) -> Result<PgPool> {
    let strategy = ExponentialBackoff::from_millis(100)
        .max_delay(Duration::from_secs(10))
        .map(jitter)
        .take(config.db_connect_retries.saturating_sub(1));

    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime));

    Retry::spawn(strategy, || {
        let options = options.clone();
        async move {
            options
                .connect(&config.database_url)
                .await
                .inspect_err(|e| tracing::warn!(error = %e, "Database connection attempt failed"))
        }
    })
    .await
    .context("Failed to connect to database")
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
