//! Products Domain
//!
//! Product catalog CRUD over a document store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← list/get/create/update/delete
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← trait + MongoDB and in-memory adapters
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Models/Query│  ← entities, DTOs, filter + pagination
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum::Router;
//! use domain_products::{handlers, MongoProductRepository, ProductService};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//!
//! let service = ProductService::new(MongoProductRepository::new(&db));
//! let app: Router = Router::new().nest("/products", handlers::router(service));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod query;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use memory::InMemoryProductRepository;
pub use models::{CreateProduct, Product, ProductCategory, ProductList, UpdateProduct};
pub use mongodb::MongoProductRepository;
pub use query::{
    FieldMatch, ListQuery, MAX_PAGE, Pagination, ProductField, ProductFilter, RES_PER_PAGE,
};
pub use repository::ProductRepository;
pub use service::ProductService;
