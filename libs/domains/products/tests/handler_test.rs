//! Handler tests for the Products domain
//!
//! These drive `handlers::router` over an in-memory repository:
//! - Request decoding and path id parsing
//! - Status codes and the `{"data": ...}` envelope
//! - Error bodies
//! - Existence checks before mutation

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::ErrorResponse;
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn app(repo: InMemoryProductRepository) -> Router {
    handlers::router(DefaultProductService::new(repo))
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn seed(repo: &InMemoryProductRepository, name: &str) -> Product {
    repo.insert(NewProduct {
        name: name.to_string(),
        price: 1.5,
        quantity: 100,
    })
    .await
    .unwrap()
}

/// Repository whose every call fails like a dropped connection.
struct UnavailableRepository;

#[async_trait]
impl ProductRepository for UnavailableRepository {
    async fn insert(&self, _input: NewProduct) -> ProductResult<Product> {
        Err(ProductError::Storage("connection refused".to_string()))
    }

    async fn get_by_id(&self, _id: i64) -> ProductResult<Product> {
        Err(ProductError::Storage("connection refused".to_string()))
    }

    async fn update(&self, _product: Product) -> ProductResult<Product> {
        Err(ProductError::Storage("connection refused".to_string()))
    }

    async fn delete(&self, _id: i64) -> ProductResult<()> {
        Err(ProductError::Storage("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_create_product_returns_201_with_envelope() {
    let app = app(InMemoryProductRepository::new());

    let response = app
        .oneshot(json_request(
            "POST",
            "/products",
            r#"{"name":"Pen","price":1.5,"quantity":100}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(
        body,
        json!({"data": {"id": 1, "name": "Pen", "price": 1.5, "quantity": 100}})
    );
}

#[tokio::test]
async fn test_created_ids_are_positive_and_distinct() {
    let app = app(InMemoryProductRepository::new());

    let mut ids = Vec::new();
    for name in ["Pen", "Pencil", "Eraser"] {
        let body = json!({"name": name, "price": 0.99, "quantity": 10}).to_string();
        let response = app
            .clone()
            .oneshot(json_request("POST", "/products", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let created: ProductResponse = json_body(response.into_body()).await;
        ids.push(created.data.id);
    }

    assert!(ids.iter().all(|id| *id > 0));
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn test_create_ignores_client_supplied_id() {
    let app = app(InMemoryProductRepository::new());

    let response = app
        .oneshot(json_request(
            "POST",
            "/products",
            r#"{"id":0,"name":"Pen","price":1.5,"quantity":100}"#,
        ))
        .await
        .unwrap();

    let created: ProductResponse = json_body(response.into_body()).await;
    assert_eq!(created.data.id, 1);
}

#[tokio::test]
async fn test_malformed_json_returns_400_and_creates_nothing() {
    let repo = InMemoryProductRepository::new();
    let app = app(repo.clone());

    let response = app
        .oneshot(json_request("POST", "/products", r#"{"name":"Pen","price":"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(body.error, "BadRequest");
    assert!(!body.message.is_empty());
    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_wrong_field_type_returns_400() {
    let repo = InMemoryProductRepository::new();
    let app = app(repo.clone());

    let response = app
        .oneshot(json_request(
            "POST",
            "/products",
            r#"{"name":"Pen","price":1.5,"quantity":"many"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_missing_content_type_returns_400() {
    let app = app(InMemoryProductRepository::new());

    let request = Request::builder()
        .method("POST")
        .uri("/products")
        .body(Body::from(r#"{"name":"Pen","price":1.5,"quantity":100}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_product_returns_200() {
    let repo = InMemoryProductRepository::new();
    let created = seed(&repo, "Pen").await;
    let app = app(repo);

    let response = app
        .oneshot(empty_request("GET", &format!("/products/{}", created.id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: ProductResponse = json_body(response.into_body()).await;
    assert_eq!(body.data, created);
}

#[tokio::test]
async fn test_update_replaces_every_field() {
    let repo = InMemoryProductRepository::new();
    let created = seed(&repo, "Pen").await;
    let app = app(repo.clone());

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/products/{}", created.id),
            r#"{"name":"Fountain pen","price":12.0,"quantity":3}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let expected = Product {
        id: created.id,
        name: "Fountain pen".to_string(),
        price: 12.0,
        quantity: 3,
    };
    let body: ProductResponse = json_body(response.into_body()).await;
    assert_eq!(body.data, expected);
    assert_eq!(repo.get_by_id(created.id).await.unwrap(), expected);
}

#[tokio::test]
async fn test_partial_update_is_rejected_without_writing() {
    let repo = InMemoryProductRepository::new();
    let created = seed(&repo, "Pen").await;
    let app = app(repo.clone());

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/products/{}", created.id),
            r#"{"price":2.5}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(repo.get_by_id(created.id).await.unwrap(), created);
}

#[tokio::test]
async fn test_update_missing_product_returns_404() {
    let repo = InMemoryProductRepository::new();
    let app = app(repo.clone());

    let response = app
        .oneshot(json_request(
            "PUT",
            "/products/41",
            r#"{"name":"Pen","price":1.5,"quantity":100}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(body.error, "NotFound");
    assert_eq!(body.message, "Product not found: 41");
    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_delete_missing_product_returns_404() {
    let repo = InMemoryProductRepository::new();
    let existing = seed(&repo, "Pen").await;
    let app = app(repo.clone());

    let response = app
        .oneshot(empty_request("DELETE", "/products/41"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(repo.get_by_id(existing.id).await.unwrap(), existing);
}

#[tokio::test]
async fn test_delete_then_get_reports_not_found() {
    let repo = InMemoryProductRepository::new();
    let created = seed(&repo, "Pen").await;
    let app = app(repo);
    let uri = format!("/products/{}", created.id);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &uri))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());

    let response = app.oneshot(empty_request("GET", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_integer_id_returns_400() {
    let repo = InMemoryProductRepository::new();
    seed(&repo, "Pen").await;
    let app = app(repo.clone());

    let put = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/products/one",
            r#"{"name":"Pen","price":1.5,"quantity":100}"#,
        ))
        .await
        .unwrap();
    assert_eq!(put.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = json_body(put.into_body()).await;
    assert!(body.message.contains("'one'"));

    let delete = app
        .oneshot(empty_request("DELETE", "/products/one"))
        .await
        .unwrap();
    assert_eq!(delete.status(), StatusCode::BAD_REQUEST);
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_storage_failure_returns_500_with_message() {
    let app = handlers::router(DefaultProductService::new(UnavailableRepository));

    let response = app
        .oneshot(json_request(
            "POST",
            "/products",
            r#"{"name":"Pen","price":1.5,"quantity":100}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(body.error, "InternalServerError");
    assert_eq!(body.message, "Storage error: connection refused");
}
