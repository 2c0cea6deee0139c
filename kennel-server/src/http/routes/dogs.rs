//! Public listing endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use kennel_core::Dog;
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::extractors::ListParams;
use crate::http::server::AppState;

/// One page of dogs
#[derive(Serialize)]
pub struct DogPageResponse {
    pub page: u64,
    pub dogs: Vec<Dog>,
}

/// GET /dogs?page&breed*&min_price&max_price
async fn list_dogs(
    State(state): State<Arc<AppState>>,
    ListParams(params): ListParams,
) -> Result<Json<DogPageResponse>, ApiError> {
    let page = params.page.number();
    let query = params.into_query();
    tracing::debug!(page, filter = ?query.filter, "Listing dogs");

    let dogs = state.store.select(&query).await?;
    Ok(Json(DogPageResponse { page, dogs }))
}

/// Listing routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/dogs", get(list_dogs))
}
