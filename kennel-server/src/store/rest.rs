//! PostgREST record store (Supabase REST API)
//!
//! Talks to `{url}/rest/v1/dogs`. The store key goes in both the `apikey`
//! header and the bearer token, as Supabase expects.

use std::time::Duration;

use async_trait::async_trait;
use kennel_core::{Dog, DogId, DogPatch, DogQuery, DogStore, NewDog, StoreError};
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;

const TABLE: &str = "dogs";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_ERROR_BODY: usize = 500;

/// Query parameters for a PostgREST select.
///
/// Bounds on the same column are sent as repeated keys, which PostgREST ANDs.
pub fn select_params(query: &DogQuery) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    let filter = &query.filter;

    if !filter.breeds.is_empty() {
        let values: Vec<String> = filter.breeds.iter().map(|b| quote(b)).collect();
        params.push(("breed".to_string(), format!("in.({})", values.join(","))));
    }
    if let Some(min) = filter.min_price {
        params.push(("price".to_string(), format!("gte.{}", min)));
    }
    if let Some(max) = filter.max_price {
        params.push(("price".to_string(), format!("lte.{}", max)));
    }

    params.push(("order".to_string(), "id.asc".to_string()));

    if let Some(window) = query.window {
        params.push(("offset".to_string(), window.offset_i64().to_string()));
        params.push(("limit".to_string(), window.limit_i64().to_string()));
    }

    params
}

/// Double-quote a value for an `in.(...)` list.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn id_filter(id: DogId) -> [(String, String); 1] {
    [("id".to_string(), format!("eq.{}", id))]
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
}

/// `DogStore` over the PostgREST HTTP API
pub struct RestStore {
    client: Client,
    table_url: String,
    key: String,
}

impl RestStore {
    pub fn new(base_url: &str, key: &str) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(StoreError::backend)?;

        Ok(Self {
            client,
            table_url: format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), TABLE),
            key: key.to_owned(),
        })
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .request(method, &self.table_url)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    /// Mutations ask PostgREST to echo the affected rows.
    fn mutation(&self, method: Method) -> RequestBuilder {
        self.request(method)
            .header("Prefer", "return=representation")
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Vec<Dog>, StoreError> {
        let response = request.send().await.map_err(StoreError::backend)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.message.or(body.msg))
                .unwrap_or_else(|| {
                    if text.is_empty() {
                        status.to_string()
                    } else {
                        // Truncate to keep upstream pages out of logs
                        text.chars().take(MAX_ERROR_BODY).collect()
                    }
                });
            tracing::error!(status = status.as_u16(), %message, "Record store request failed");
            return Err(StoreError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<Vec<Dog>>().await.map_err(StoreError::backend)
    }
}

#[async_trait]
impl DogStore for RestStore {
    async fn select(&self, query: &DogQuery) -> Result<Vec<Dog>, StoreError> {
        let params = select_params(query);
        tracing::debug!(?params, "PostgREST select");
        self.execute(self.request(Method::GET).query(&params)).await
    }

    async fn insert(&self, dog: NewDog) -> Result<Vec<Dog>, StoreError> {
        tracing::debug!(breed = %dog.breed, "PostgREST insert");
        self.execute(self.mutation(Method::POST).json(&dog)).await
    }

    async fn update(&self, id: DogId, patch: DogPatch) -> Result<Vec<Dog>, StoreError> {
        tracing::debug!(%id, fields = ?patch.fields(), "PostgREST update");
        self.execute(
            self.mutation(Method::PATCH)
                .query(&id_filter(id))
                .json(&patch),
        )
        .await
    }

    async fn delete(&self, id: DogId) -> Result<Vec<Dog>, StoreError> {
        tracing::debug!(%id, "PostgREST delete");
        self.execute(self.mutation(Method::DELETE).query(&id_filter(id)))
            .await
    }
}
