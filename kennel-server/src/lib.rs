//! kennel-server: HTTP server for the dog inventory
//!
//! Exposes paginated listing, the admin dashboard and admin CRUD over a
//! pluggable record store (PostgREST, PostgreSQL or in-memory).

pub mod config;
pub mod http;
pub mod store;

pub use config::{AdminCredentials, Config, ConfigError, StoreConfig, StoreKind};
pub use http::{build_router, run_server, ApiError, AppState, ServerError};
