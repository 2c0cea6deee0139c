//! HTTP layer
//!
//! Axum server with:
//! - Permissive CORS (origin mirrored, credentials allowed)
//! - Request tracing
//! - Graceful shutdown
//! - JSON error responses (`{"error": message}`)

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerError};
