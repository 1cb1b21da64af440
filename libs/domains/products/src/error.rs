use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Product not found: {0}")]
    NotFound(i64),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        let message = err.to_string();
        match err {
            ProductError::Validation(_) => AppError::BadRequest(message),
            ProductError::NotFound(_) => AppError::NotFound(message),
            ProductError::Storage(_) => AppError::InternalServerError(message),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<DbErr> for ProductError {
    fn from(err: DbErr) -> Self {
        ProductError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ProductError::Validation("bad id".into()), StatusCode::BAD_REQUEST),
            (ProductError::NotFound(3), StatusCode::NOT_FOUND),
            (
                ProductError::Storage("connection reset".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_message_is_preserved() {
        match AppError::from(ProductError::NotFound(3)) {
            AppError::NotFound(message) => assert_eq!(message, "Product not found: 3"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_db_errors_are_storage_errors() {
        let err: ProductError = DbErr::Custom("pool timed out".into()).into();
        assert!(matches!(err, ProductError::Storage(msg) if msg.contains("pool timed out")));
    }
}
