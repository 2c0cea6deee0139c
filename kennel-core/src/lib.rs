//! kennel-core: dog inventory domain
//!
//! - `models`: records, insert/update payloads and their validation
//! - `query`: filter + page window construction for list requests
//! - `stats`: dashboard statistics over the full record set
//! - `store`: the record store seam and an in-memory implementation

pub mod models;
pub mod query;
pub mod stats;
pub mod store;

pub use models::{Dog, DogId, DogPatch, NewDog, ValidationError};
pub use query::{DogFilter, DogListParams, DogQuery, Page, Window, PAGE_SIZE};
pub use stats::{summarize, BreedDistribution, Statistics};
pub use store::{DogStore, MemoryStore, StoreError};
