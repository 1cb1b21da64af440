use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait};

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::{NewProduct, Product},
    repository::ProductRepository,
};

/// PostgreSQL implementation of ProductRepository
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn insert(&self, input: NewProduct) -> ProductResult<Product> {
        let active_model: entity::ActiveModel = input.into();
        let model = active_model.insert(&self.db).await?;

        tracing::debug!(product_id = model.id, "Inserted product");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i64) -> ProductResult<Product> {
        entity::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Product::from)
            .ok_or(ProductError::NotFound(id))
    }

    async fn update(&self, product: Product) -> ProductResult<Product> {
        let id = product.id;
        let active_model: entity::ActiveModel = product.into();

        let model = active_model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => {
                ProductError::Storage(format!("update of product {id} affected no rows"))
            }
            other => other.into(),
        })?;

        tracing::debug!(product_id = id, "Updated product");
        Ok(model.into())
    }

    async fn delete(&self, id: i64) -> ProductResult<()> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        tracing::debug!(
            product_id = id,
            rows_affected = result.rows_affected,
            "Deleted product"
        );
        Ok(())
    }
}
