use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Assigned by the store on insert
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Pen")]
    pub name: String,
    #[schema(example = 1.5)]
    pub price: f64,
    #[schema(example = 100)]
    pub quantity: i32,
}

/// Request body for creating or replacing a product.
///
/// All fields are required. Unknown fields, including `id`, are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductPayload {
    #[schema(example = "Pen")]
    pub name: String,
    #[schema(example = 1.5)]
    pub price: f64,
    #[schema(example = 100)]
    pub quantity: i32,
}

impl ProductPayload {
    /// The payload as a product stored under `id`.
    pub fn with_id(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            quantity: self.quantity,
        }
    }
}

/// Insert input; the store assigns the id
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub quantity: i32,
}

impl From<ProductPayload> for NewProduct {
    fn from(payload: ProductPayload) -> Self {
        Self {
            name: payload.name,
            price: payload.price,
            quantity: payload.quantity,
        }
    }
}

/// Success envelope: `{"data": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub data: Product,
}

impl From<Product> for ProductResponse {
    fn from(data: Product) -> Self {
        Self { data }
    }
}
