use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    /// Raised by lookups only; update and delete report absence as `None`.
    #[error("Product not found")]
    NotFound,

    /// Any failure from the backing store, including ids the store cannot parse.
    #[error("Store error: {0}")]
    Store(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound => AppError::NotFound("Product not found".to_string()),
            ProductError::Store(msg) => AppError::Store(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::Store(err.to_string())
    }
}

impl From<mongodb::bson::oid::Error> for ProductError {
    fn from(err: mongodb::bson::oid::Error) -> Self {
        ProductError::Store(format!("invalid product id: {err}"))
    }
}
