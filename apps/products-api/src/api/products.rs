//! Products API routes

use axum::Router;
use domain_products::{InMemoryProductRepository, MongoProductRepository, ProductService, handlers};

use crate::state::{AppState, Backend};

/// Products router over the configured backend
pub fn router(state: &AppState) -> Router {
    match &state.backend {
        Backend::Mongo { db, .. } => {
            handlers::router(ProductService::new(MongoProductRepository::new(db)))
        }
        Backend::Memory => {
            handlers::router(ProductService::new(InMemoryProductRepository::new()))
        }
    }
}
