//! Products API routes

use axum::Router;
use domain_products::{DefaultProductService, PgProductRepository, handlers};

use crate::state::AppState;

/// Create products router
pub fn router(state: &AppState) -> Router {
    let repository = PgProductRepository::new(state.db.clone());
    let service = DefaultProductService::new(repository);
    handlers::router(service)
}
