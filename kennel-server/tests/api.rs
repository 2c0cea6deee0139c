//! End-to-end route tests against an in-memory record store

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use kennel_core::{
    Dog, DogId, DogPatch, DogQuery, DogStore, MemoryStore, NewDog, StoreError,
};
use kennel_server::{build_router, AdminCredentials, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

const TOKEN: &str = "test-admin-token";

fn admin() -> AdminCredentials {
    AdminCredentials {
        username: "admin".into(),
        password: "s3cret".into(),
        token: TOKEN.into(),
    }
}

fn app_with(store: Arc<dyn DogStore>) -> Router {
    build_router(AppState::new(store, admin()))
}

fn dog(id: i64, breed: Option<&str>, price: Option<f64>) -> Dog {
    Dog {
        id: DogId::new(id),
        name: Some(format!("dog-{}", id)),
        image: Some(format!("https://img.example/{}.png", id)),
        breed: breed.map(str::to_owned),
        price,
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn admin_json(method: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri("/admin")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", TOKEN))
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Store that fails every call
struct BrokenStore;

#[async_trait]
impl DogStore for BrokenStore {
    async fn select(&self, _query: &DogQuery) -> Result<Vec<Dog>, StoreError> {
        Err(StoreError::backend("connection refused"))
    }

    async fn insert(&self, _dog: NewDog) -> Result<Vec<Dog>, StoreError> {
        Err(StoreError::Upstream {
            status: 409,
            message: "duplicate key value".into(),
        })
    }

    async fn update(&self, _id: DogId, _patch: DogPatch) -> Result<Vec<Dog>, StoreError> {
        Err(StoreError::backend("connection refused"))
    }

    async fn delete(&self, _id: DogId) -> Result<Vec<Dog>, StoreError> {
        Err(StoreError::backend("connection refused"))
    }
}

#[tokio::test]
async fn home_and_health() {
    let app = app_with(Arc::new(MemoryStore::new()));

    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Welcome to the Dog API!");

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn dashboard_statistics() {
    let store = MemoryStore::with_dogs([
        dog(1, Some("Lab"), Some(100.0)),
        dog(2, Some("Lab"), Some(200.0)),
        dog(3, Some("Poodle"), None),
    ]);
    let app = app_with(Arc::new(store));

    let (status, body) = send(&app, get("/dashboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dogs"].as_array().unwrap().len(), 3);

    let stats = &body["statistics"];
    assert_eq!(stats["total_dogs"], 3);
    assert_eq!(stats["unique_breeds"], 2);
    assert_eq!(stats["breed_distribution"], json!({"Lab": 2, "Poodle": 1}));
    assert_eq!(stats["total_inventory_value"].as_f64(), Some(300.0));
    assert_eq!(stats["average_price"].as_f64(), Some(100.0));
}

#[tokio::test]
async fn dashboard_empty_store() {
    let app = app_with(Arc::new(MemoryStore::new()));

    let (status, body) = send(&app, get("/dashboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dogs"], json!([]));

    let stats = &body["statistics"];
    assert_eq!(stats["total_dogs"], 0);
    assert_eq!(stats["unique_breeds"], 0);
    assert_eq!(stats["breed_distribution"], json!({}));
    assert_eq!(stats["total_inventory_value"].as_f64(), Some(0.0));
    assert_eq!(stats["average_price"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn second_page_with_min_price() {
    // 25 matching (price >= 50) plus 5 cheap ones interleaved
    let mut dogs = Vec::new();
    for i in 1..=30 {
        let price = if i % 6 == 0 { 10.0 } else { 50.0 + i as f64 };
        dogs.push(dog(i, Some("Lab"), Some(price)));
    }
    let app = app_with(Arc::new(MemoryStore::with_dogs(dogs.clone())));

    let (status, body) = send(&app, get("/dogs?page=2&min_price=50")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 2);

    let matching: Vec<i64> = dogs
        .iter()
        .filter(|d| d.price.unwrap() >= 50.0)
        .map(|d| d.id.get())
        .collect();
    assert_eq!(matching.len(), 25);

    let ids: Vec<i64> = body["dogs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, matching[20..].to_vec());
}

#[tokio::test]
async fn repeated_breed_filter() {
    let app = app_with(Arc::new(MemoryStore::with_dogs([
        dog(1, Some("Lab"), Some(1.0)),
        dog(2, Some("Pug"), Some(2.0)),
        dog(3, Some("Poodle"), Some(3.0)),
        dog(4, None, Some(4.0)),
    ])));

    let (status, body) = send(&app, get("/dogs?breed=Lab&breed=Poodle")).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body["dogs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn empty_results_are_not_errors() {
    let app = app_with(Arc::new(MemoryStore::with_dogs([dog(1, Some("Lab"), Some(100.0))])));

    for uri in [
        "/dogs?breed=Dachshund",
        "/dogs?min_price=500&max_price=10",
        "/dogs?page=9",
    ] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(body["dogs"], json!([]), "{}", uri);
    }
}

#[tokio::test]
async fn page_below_one_is_clamped() {
    let app = app_with(Arc::new(MemoryStore::with_dogs([dog(1, Some("Lab"), Some(1.0))])));

    let (status, body) = send(&app, get("/dogs?page=-3")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["dogs"].as_array().unwrap().len(), 1);

    let (_, body) = send(&app, get("/dogs?page=abc")).await;
    assert_eq!(body["page"], 1);
}

#[tokio::test]
async fn store_failure_is_500() {
    let app = app_with(Arc::new(BrokenStore));

    let (status, body) = send(&app, get("/dashboard")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "connection refused"}));

    let (status, body) = send(&app, get("/dogs")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "connection refused");

    let (status, body) = send(
        &app,
        admin_json(
            "POST",
            json!({"name": "Rex", "image": "rex.png", "breed": "Lab", "price": 10}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "duplicate key value");
}

#[tokio::test]
async fn login() {
    let app = app_with(Arc::new(MemoryStore::new()));
    let login = |body: Value| {
        Request::builder()
            .method("POST")
            .uri("/admin/login")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    };

    let (status, body) = send(&app, login(json!({"username": "admin", "password": "s3cret"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["access_token"], TOKEN);
    assert_eq!(body["message"], "Login successful");

    let (status, body) = send(&app, login(json!({"username": "admin", "password": "nope"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({"error": "Invalid credentials"}));

    let (status, _) = send(&app, login(json!({}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let form = Request::builder()
        .method("POST")
        .uri("/admin/login")
        .header("content-type", "text/plain")
        .body(Body::from("username=admin&password=s3cret"))
        .unwrap();
    let (status, body) = send(&app, form).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Request must be JSON"}));
}

#[tokio::test]
async fn admin_routes_require_token() {
    let store = Arc::new(MemoryStore::new());
    let app = app_with(store.clone());

    let unauthenticated = Request::builder()
        .method("POST")
        .uri("/admin")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"name": "Rex", "image": "rex.png", "breed": "Lab", "price": 10}).to_string(),
        ))
        .unwrap();
    let (status, body) = send(&app, unauthenticated).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Invalid or missing admin token");

    let wrong_token = Request::builder()
        .method("DELETE")
        .uri("/admin?id=1")
        .header("authorization", "Bearer guess")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, wrong_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert!(store.is_empty());
}

#[tokio::test]
async fn create_update_delete() {
    let store = Arc::new(MemoryStore::new());
    let app = app_with(store.clone());

    let (status, body) = send(
        &app,
        admin_json(
            "POST",
            json!({"name": "Rex", "image": "rex.png", "breed": "Lab", "price": 120, "extra": true}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Dog added successfully");
    let id = body["data"][0]["id"].as_i64().unwrap();
    assert_eq!(body["data"][0]["breed"], "Lab");

    let (status, body) = send(
        &app,
        admin_json("PUT", json!({"id": id, "price": 150, "owner": "ignored"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Dog updated");
    assert_eq!(body["data"][0]["price"].as_f64(), Some(150.0));
    assert_eq!(body["data"][0]["name"], "Rex");

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/admin?id={}", id))
        .header("authorization", format!("Bearer {}", TOKEN))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, delete).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Dog deleted");
    assert_eq!(body["data"][0]["id"], id);
    assert!(store.is_empty());
}

#[tokio::test]
async fn delete_by_json_body() {
    let store = Arc::new(MemoryStore::with_dogs([dog(7, Some("Pug"), Some(5.0))]));
    let app = app_with(store.clone());

    let (status, body) = send(&app, admin_json("DELETE", json!({"id": "7"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], 7);
    assert!(store.is_empty());
}

#[tokio::test]
async fn delete_with_repeated_id_uses_first() {
    let store = Arc::new(MemoryStore::with_dogs([
        dog(1, Some("Lab"), Some(10.0)),
        dog(2, Some("Pug"), Some(20.0)),
    ]));
    let app = app_with(store.clone());

    let delete = Request::builder()
        .method("DELETE")
        .uri("/admin?id=1&id=2")
        .header("authorization", format!("Bearer {}", TOKEN))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, delete).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Dog deleted");
    assert_eq!(body["data"], json!([dog(1, Some("Lab"), Some(10.0))]));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn lowercase_bearer_scheme_is_accepted() {
    let store = Arc::new(MemoryStore::with_dogs([dog(3, None, None)]));
    let app = app_with(store.clone());

    let delete = Request::builder()
        .method("DELETE")
        .uri("/admin?id=3")
        .header("authorization", format!("bearer {}", TOKEN))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, delete).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], 3);
    assert!(store.is_empty());
}

#[tokio::test]
async fn admin_input_errors() {
    let app = app_with(Arc::new(MemoryStore::new()));

    let cases = [
        (
            admin_json("POST", json!({"name": "Rex", "breed": "Lab"})),
            "Missing required fields",
        ),
        (admin_json("PUT", json!({"price": 10})), "Missing dog id"),
        (
            admin_json("PUT", json!({"id": 1, "color": "brown"})),
            "No valid fields to update",
        ),
        (admin_json("DELETE", json!({})), "Missing dog id"),
        (
            Request::builder()
                .method("POST")
                .uri("/admin")
                .header("content-type", "text/plain")
                .header("authorization", format!("Bearer {}", TOKEN))
                .body(Body::from("name=Rex"))
                .unwrap(),
            "Request must be JSON",
        ),
        (
            Request::builder()
                .method("DELETE")
                .uri("/admin")
                .header("authorization", format!("Bearer {}", TOKEN))
                .body(Body::empty())
                .unwrap(),
            "Missing dog id",
        ),
    ];

    for (request, message) in cases {
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", message);
        assert_eq!(body, json!({ "error": message }));
    }
}

#[tokio::test]
async fn update_unknown_id_returns_empty_data() {
    let app = app_with(Arc::new(MemoryStore::new()));

    let (status, body) = send(&app, admin_json("PUT", json!({"id": 42, "name": "Ghost"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}
