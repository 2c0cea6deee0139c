//! Admin login and record mutations
//!
//! POST/PUT/DELETE /admin require `Authorization: Bearer <ADMIN_TOKEN>`;
//! the token is the one handed out by POST /admin/login.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use kennel_core::{Dog, DogId, DogPatch, NewDog};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::extractors::{AdminGuard, IdQuery, JsonObject};
use crate::http::server::AppState;

/// Successful login
#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub message: &'static str,
}

/// Result of a create/update/delete: the affected rows
#[derive(Serialize)]
pub struct MutationResponse {
    pub message: &'static str,
    pub data: Vec<Dog>,
}

/// POST /admin/login
async fn login(
    State(state): State<Arc<AppState>>,
    body: JsonObject,
) -> Result<Json<LoginResponse>, ApiError> {
    let body = body.require()?;
    let username = body.get("username").and_then(|v| v.as_str());
    let password = body.get("password").and_then(|v| v.as_str());

    match (username, password) {
        (Some(username), Some(password)) if state.admin.verify(username, password) => {
            tracing::info!(username, "Admin login");
            Ok(Json(LoginResponse {
                access_token: state.admin.token.clone(),
                message: "Login successful",
            }))
        }
        _ => Err(ApiError::Forbidden {
            reason: "Invalid credentials",
        }),
    }
}

/// POST /admin - create a dog
async fn create_dog(
    _guard: AdminGuard,
    State(state): State<Arc<AppState>>,
    body: JsonObject,
) -> Result<Json<MutationResponse>, ApiError> {
    let payload = body.require()?;
    let dog = NewDog::from_payload(&payload)?;

    let data = state.store.insert(dog).await?;
    tracing::info!(ids = ?data.iter().map(|d| d.id).collect::<Vec<_>>(), "Dog added");

    Ok(Json(MutationResponse {
        message: "Dog added successfully",
        data,
    }))
}

/// PUT /admin - partial update by id
async fn update_dog(
    _guard: AdminGuard,
    State(state): State<Arc<AppState>>,
    body: JsonObject,
) -> Result<Json<MutationResponse>, ApiError> {
    let payload = body.require()?;
    let id = DogId::from_value(payload.get("id"))?;
    let patch = DogPatch::from_payload(&payload)?;

    tracing::info!(%id, fields = ?patch.fields(), "Updating dog");
    let data = state.store.update(id, patch).await?;

    Ok(Json(MutationResponse {
        message: "Dog updated",
        data,
    }))
}

/// DELETE /admin - delete by id from the JSON body or `?id=`
async fn delete_dog(
    _guard: AdminGuard,
    State(state): State<Arc<AppState>>,
    IdQuery(query_id): IdQuery,
    body: JsonObject,
) -> Result<Json<MutationResponse>, ApiError> {
    let id = match body.0 {
        Some(payload) => DogId::from_value(payload.get("id"))?,
        None => DogId::parse(query_id.as_deref().unwrap_or_default())?,
    };

    tracing::info!(%id, "Deleting dog");
    let data = state.store.delete(id).await?;

    Ok(Json(MutationResponse {
        message: "Dog deleted",
        data,
    }))
}

/// Admin routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/login", post(login))
        .route(
            "/admin",
            post(create_dog).put(update_dog).delete(delete_dog),
        )
}
