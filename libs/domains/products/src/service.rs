//! Product Service - forwards to the repository and logs failures

use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

use crate::error::ProductResult;
use crate::models::{NewProduct, Product};
use crate::repository::ProductRepository;

/// Operations the HTTP layer needs from the domain
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductService: Send + Sync {
    async fn add_product(&self, input: NewProduct) -> ProductResult<Product>;

    async fn get_product_by_id(&self, id: i64) -> ProductResult<Product>;

    /// Replaces the stored product wholesale. Does not check existence.
    async fn update_product(&self, product: Product) -> ProductResult<Product>;

    /// Does not check existence.
    async fn remove_product(&self, id: i64) -> ProductResult<()>;
}

/// Repository-backed [`ProductService`]
pub struct DefaultProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> DefaultProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }
}

impl<R: ProductRepository> Clone for DefaultProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

/// Logs a failed call under its method name and operation type, then hands the result back.
fn logged<T>(
    result: ProductResult<T>,
    method_name: &'static str,
    operation_type: &'static str,
) -> ProductResult<T> {
    if let Err(ref e) = result {
        tracing::error!(method_name, operation_type, "{}", e);
    }
    result
}

#[async_trait]
impl<R: ProductRepository> ProductService for DefaultProductService<R> {
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn add_product(&self, input: NewProduct) -> ProductResult<Product> {
        logged(
            self.repository.insert(input).await,
            "AddProduct",
            "AddProduct_Service_Action",
        )
    }

    #[instrument(skip(self))]
    async fn get_product_by_id(&self, id: i64) -> ProductResult<Product> {
        logged(
            self.repository.get_by_id(id).await,
            "GetProductById",
            "GetProductById_Service_Action",
        )
    }

    #[instrument(skip(self, product), fields(product_id = product.id))]
    async fn update_product(&self, product: Product) -> ProductResult<Product> {
        logged(
            self.repository.update(product).await,
            "UpdateProduct",
            "UpdateProduct_Service_Action",
        )
    }

    #[instrument(skip(self))]
    async fn remove_product(&self, id: i64) -> ProductResult<()> {
        logged(
            self.repository.delete(id).await,
            "RemoveProduct",
            "RemoveProduct_Service_Action",
        )
    }
}
