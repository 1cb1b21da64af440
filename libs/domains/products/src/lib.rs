//! Products Domain
//!
//! CRUD for the `products` table, layered the usual way:
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, existence checks before mutation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Forwards to the repository, logs failures
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + PostgreSQL / in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Product, request and response bodies
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{
//!     handlers,
//!     repository::InMemoryProductRepository,
//!     service::DefaultProductService,
//! };
//!
//! let repository = InMemoryProductRepository::new();
//! let service = DefaultProductService::new(repository);
//!
//! // Serves /products and /products/{id}
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{NewProduct, Product, ProductPayload, ProductResponse};
pub use postgres::PgProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::{DefaultProductService, ProductService};
