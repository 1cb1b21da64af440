use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{NewProduct, Product};

/// Repository trait for Product persistence
///
/// Implementations only translate to storage operations; existence checks
/// before mutation belong to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persist a new product and return it with its assigned id
    async fn insert(&self, input: NewProduct) -> ProductResult<Product>;

    /// Fetch a product, `NotFound` when no row matches
    async fn get_by_id(&self, id: i64) -> ProductResult<Product>;

    /// Overwrite every field of the row matching `product.id`
    async fn update(&self, product: Product) -> ProductResult<Product>;

    /// Remove the row matching `id`; succeeds when nothing matched
    async fn delete(&self, id: i64) -> ProductResult<()>;
}

#[derive(Debug)]
struct Store {
    products: BTreeMap<i64, Product>,
    next_id: i64,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            products: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.products.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn insert(&self, input: NewProduct) -> ProductResult<Product> {
        let mut store = self.store.write().await;

        let id = store.next_id;
        store.next_id += 1;

        let product = Product {
            id,
            name: input.name,
            price: input.price,
            quantity: input.quantity,
        };
        store.products.insert(id, product.clone());

        tracing::debug!(product_id = id, "Inserted product");
        Ok(product)
    }

    async fn get_by_id(&self, id: i64) -> ProductResult<Product> {
        let store = self.store.read().await;
        store
            .products
            .get(&id)
            .cloned()
            .ok_or(ProductError::NotFound(id))
    }

    async fn update(&self, product: Product) -> ProductResult<Product> {
        let mut store = self.store.write().await;

        match store.products.get_mut(&product.id) {
            Some(existing) => {
                *existing = product.clone();
                tracing::debug!(product_id = product.id, "Updated product");
                Ok(product)
            }
            None => Err(ProductError::Storage(format!(
                "update of product {} affected no rows",
                product.id
            ))),
        }
    }

    async fn delete(&self, id: i64) -> ProductResult<()> {
        let mut store = self.store.write().await;

        if store.products.remove(&id).is_some() {
            tracing::debug!(product_id = id, "Deleted product");
        }
        Ok(())
    }
}
