//! Record store seam
//!
//! The HTTP layer talks to the database only through `DogStore`. The
//! networked backends live in `kennel-server`; `MemoryStore` lives here so
//! every layer can test against the same filter semantics.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::models::{Dog, DogId, DogPatch, NewDog};
use crate::query::DogQuery;

/// Error raised by a record store. Never retried.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store answered with a non-success status
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// Transport, driver or decoding failure
    #[error("{0}")]
    Backend(Box<dyn std::error::Error + Send + Sync>),

    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn backend<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Backend(err.into())
    }
}

/// The external database holding the `dogs` table
#[async_trait]
pub trait DogStore: Send + Sync {
    /// Rows matching `query`, ordered by id ascending.
    async fn select(&self, query: &DogQuery) -> Result<Vec<Dog>, StoreError>;

    /// Insert one record, returning the stored rows.
    async fn insert(&self, dog: NewDog) -> Result<Vec<Dog>, StoreError>;

    /// Apply `patch` to the row with `id`, returning the affected rows.
    async fn update(&self, id: DogId, patch: DogPatch) -> Result<Vec<Dog>, StoreError>;

    /// Remove the row with `id`, returning the removed rows.
    async fn delete(&self, id: DogId) -> Result<Vec<Dog>, StoreError>;
}
