//! API routes module

pub mod health;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Product routes plus the readiness probe
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/products", products::router(state))
        .merge(health::router(state.clone()))
}
