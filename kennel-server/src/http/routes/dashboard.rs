//! Admin dashboard: every record plus inventory statistics

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use kennel_core::{summarize, Dog, DogQuery, Statistics};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct DashboardResponse {
    pub dogs: Vec<Dog>,
    pub statistics: Statistics,
}

/// GET /dashboard
async fn dashboard(State(state): State<Arc<AppState>>) -> Result<Json<DashboardResponse>, ApiError> {
    let dogs = state.store.select(&DogQuery::all()).await?;
    let statistics = summarize(&dogs);
    tracing::debug!(total = statistics.total_dogs, "Dashboard statistics computed");

    Ok(Json(DashboardResponse { dogs, statistics }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/dashboard", get(dashboard))
}
