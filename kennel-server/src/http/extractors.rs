//! Custom Axum extractors

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use kennel_core::{DogListParams, ValidationError};
use serde_json::{Map, Value};

use super::error::ApiError;
use super::server::AppState;

/// True for `application/json` and `application/*+json` content types.
pub fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// JSON object body, or `None` when the request is not declared as JSON.
///
/// A JSON content type with a body that is not an object is rejected.
pub struct JsonObject(pub Option<Map<String, Value>>);

impl JsonObject {
    /// The object, or `Request must be JSON`.
    pub fn require(self) -> Result<Map<String, Value>, ApiError> {
        self.0.ok_or(ApiError::Validation(ValidationError::NotJson))
    }
}

impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json(req.headers()) {
            return Ok(Self(None));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::NotJson))?;

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Ok(Self(Some(map))),
            _ => Err(ApiError::Validation(ValidationError::NotJson)),
        }
    }
}

/// `GET /dogs` query string; `breed` may repeat
pub struct ListParams(pub DogListParams);

impl<S> FromRequestParts<S> for ListParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(DogListParams::from_pairs(query_pairs(parts)?)))
    }
}

/// First `id` in the query string, if any; later repeats are ignored
pub struct IdQuery(pub Option<String>);

impl<S> FromRequestParts<S> for IdQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = query_pairs(parts)?
            .into_iter()
            .find_map(|(key, value)| (key == "id").then_some(value));
        Ok(Self(id))
    }
}

fn query_pairs(parts: &Parts) -> Result<Vec<(String, String)>, ApiError> {
    let Query(pairs): Query<Vec<(String, String)>> =
        Query::try_from_uri(&parts.uri).map_err(|e| ApiError::BadRequest {
            message: e.body_text(),
        })?;
    Ok(pairs)
}

/// Proof that the request carries `Authorization: Bearer <admin token>`
pub struct AdminGuard;

impl FromRequestParts<Arc<AppState>> for AdminGuard {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token);

        match token {
            Some(token) if state.admin.accepts_token(token) => Ok(Self),
            _ => Err(ApiError::Forbidden {
                reason: "Invalid or missing admin token",
            }),
        }
    }
}

// Auth scheme names are case-insensitive
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(char::is_whitespace)?;
    scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
}
