//! Axum server setup
//!
//! Server skeleton with:
//! - Permissive CORS with credentials
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::sync::Arc;

use axum::Router;
use kennel_core::{DogStore, StoreError};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::config::{AdminCredentials, Config};
use crate::store;

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn DogStore>,
    pub admin: AdminCredentials,
}

impl AppState {
    pub fn new(store: Arc<dyn DogStore>, admin: AdminCredentials) -> Self {
        Self { store, admin }
    }
}

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::dogs::router())
        .merge(routes::dashboard::router())
        .merge(routes::admin::router())
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Connect the record store and serve until a shutdown signal arrives.
///
/// # Example
///
/// ```ignore
/// let config = Config::from_env()?;
/// run_server(config).await?;
/// ```
pub async fn run_server(config: Config) -> Result<(), ServerError> {
    let store = store::connect(&config.store).await?;
    let app = build_router(AppState::new(store, config.admin));

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("record store error: {0}")]
    Store(#[from] StoreError),
}
