//! Catalog application composition root
//!
//! Selects the catalog store and composes the domain routers into a single
//! application.

use std::sync::Arc;

use axum::Router;
use catalog_common::{Config, StoreBackend};
use catalog_compositions::{CatalogStore, CompositionsState, InMemoryCatalogStore, PgCatalogStore};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

/// Build the catalog store selected by the configuration
pub async fn create_store(config: &Config) -> anyhow::Result<Arc<dyn CatalogStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            warn!("Using in-memory catalog store with sample data; data is lost on shutdown");
            Ok(Arc::new(InMemoryCatalogStore::with_sample_catalog()))
        }
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required"))?;

            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await
                .map_err(|e| anyhow::anyhow!("Database connection failed: {}", e))?;

            info!("Database connection established");

            if config.run_migrations {
                sqlx::migrate!("../../migrations").run(&pool).await?;
                info!("Database migrations applied");
            }

            Ok(Arc::new(PgCatalogStore::new(pool)))
        }
    }
}

/// Create the main application router with all routes
pub fn create_app(store: Arc<dyn CatalogStore>) -> Router {
    let compositions_state = CompositionsState::new(store);

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { concat!("Catalog API v", env!("CARGO_PKG_VERSION")) }),
        )
        .merge(catalog_compositions::routes().with_state(compositions_state))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
