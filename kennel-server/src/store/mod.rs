//! Record store backends
//!
//! - `rest`: PostgREST / Supabase REST API over reqwest
//! - `pg`: direct PostgreSQL over a sqlx pool
//!
//! `connect` picks one from the store URL scheme.

pub mod pg;
pub mod rest;

pub use pg::{create_pool, PgStore};
pub use rest::RestStore;

use std::sync::Arc;

use kennel_core::{DogStore, MemoryStore, StoreError};

use crate::config::{StoreConfig, StoreKind};

/// Open the configured record store.
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn DogStore>, StoreError> {
    let kind = config.kind().map_err(StoreError::backend)?;
    tracing::info!(?kind, "Connecting record store");

    let store: Arc<dyn DogStore> = match kind {
        StoreKind::Rest => Arc::new(RestStore::new(&config.url, &config.key)?),
        StoreKind::Postgres => {
            let pool = create_pool(&config.url).await.map_err(StoreError::backend)?;
            let store = PgStore::new(pool);
            store.ensure_schema().await?;
            Arc::new(store)
        }
        StoreKind::Memory => {
            tracing::warn!("Using in-memory record store; records are lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    Ok(store)
}
