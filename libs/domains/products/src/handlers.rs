//! HTTP handlers for the Products API

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{AppError, ErrorResponse};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductError;
use crate::models::{Product, ProductPayload, ProductResponse};
use crate::service::ProductService;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(create_product, get_product, update_product, delete_product),
    components(schemas(Product, ProductPayload, ProductResponse, ErrorResponse)),
    tags(
        (name = "Products", description = "Product management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the products router with all HTTP endpoints
pub fn router<S: ProductService + 'static>(service: S) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/products", post(create_product::<S>))
        .route(
            "/products/{id}",
            get(get_product::<S>)
                .put(update_product::<S>)
                .delete(delete_product::<S>),
        )
        .with_state(shared_service)
}

/// Logs a failed request step before it becomes the response.
fn failed(method_name: &'static str, operation_type: &'static str, err: AppError) -> AppError {
    tracing::error!(method_name, operation_type, "{}", err);
    err
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>().map_err(|e| {
        ProductError::Validation(format!("product id '{raw}' is not an integer: {e}")).into()
    })
}

/// Create a new product
#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
async fn create_product<S: ProductService>(
    State(service): State<Arc<S>>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        failed(
            "AddProduct",
            "AddProduct_Handler_Bind_Operation",
            rejection.into(),
        )
    })?;

    let product = service.add_product(payload.into()).await.map_err(|e| {
        failed(
            "AddProduct",
            "AddProduct_Handler_Insert_Operation",
            e.into(),
        )
    })?;

    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 400, description = "Id is not an integer", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
async fn get_product<S: ProductService>(
    State(service): State<Arc<S>>,
    Path(raw_id): Path<String>,
) -> Result<Json<ProductResponse>, AppError> {
    let id = parse_id(&raw_id).map_err(|e| {
        failed(
            "GetProductById",
            "GetProductById_Handler_Convert_Id_Operation",
            e,
        )
    })?;

    let product = service.get_product_by_id(id).await.map_err(|e| {
        failed(
            "GetProductById",
            "GetProductById_Handler_Get_Operation",
            e.into(),
        )
    })?;

    Ok(Json(product.into()))
}

/// Replace a product
///
/// Every field is overwritten; a body missing any field is rejected.
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Products",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Product replaced", body = ProductResponse),
        (status = 400, description = "Id is not an integer or body is malformed", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
async fn update_product<S: ProductService>(
    State(service): State<Arc<S>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<Json<ProductResponse>, AppError> {
    let id = parse_id(&raw_id).map_err(|e| {
        failed(
            "UpdateProduct",
            "UpdateProduct_Handler_Convert_Id_Operation",
            e,
        )
    })?;

    let Json(payload) = payload.map_err(|rejection| {
        failed(
            "UpdateProduct",
            "UpdateProduct_Handler_Bind_Operation",
            rejection.into(),
        )
    })?;

    service.get_product_by_id(id).await.map_err(|e| {
        failed(
            "UpdateProduct",
            "UpdateProduct_Handler_IsExists_Operation",
            e.into(),
        )
    })?;

    let product = service
        .update_product(payload.with_id(id))
        .await
        .map_err(|e| {
            failed(
                "UpdateProduct",
                "UpdateProduct_Handler_Update_Operation",
                e.into(),
            )
        })?;

    Ok(Json(product.into()))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Products",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, description = "Id is not an integer", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
async fn delete_product<S: ProductService>(
    State(service): State<Arc<S>>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&raw_id).map_err(|e| {
        failed(
            "DeleteProduct",
            "DeleteProduct_Handler_Bind_Id_Operation",
            e,
        )
    })?;

    service.get_product_by_id(id).await.map_err(|e| {
        failed(
            "DeleteProduct",
            "DeleteProduct_Handler_IsExists_Operation",
            e.into(),
        )
    })?;

    service.remove_product(id).await.map_err(|e| {
        failed(
            "DeleteProduct",
            "DeleteProduct_Handler_Delete_Operation",
            e.into(),
        )
    })?;

    Ok(StatusCode::NO_CONTENT)
}
