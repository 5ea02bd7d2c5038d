use async_trait::async_trait;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, UpdateProduct};
use crate::query::{Pagination, ProductFilter};

/// Persistence port for products.
///
/// Ids are opaque strings owned by the store. An id the store cannot parse
/// is a [`ProductError::Store`](crate::error::ProductError::Store), never `None`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a product; the store assigns the id and both timestamps.
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    async fn get_by_id(&self, id: &str) -> ProductResult<Option<Product>>;

    /// One page of matching products in store-native order.
    async fn list(
        &self,
        filter: &ProductFilter,
        pagination: &Pagination,
    ) -> ProductResult<Vec<Product>>;

    async fn count(&self, filter: &ProductFilter) -> ProductResult<u64>;

    /// Apply supplied fields and refresh `updated_at`. Returns the product
    /// after the change, or `None` when nothing has this id.
    async fn update(&self, id: &str, input: UpdateProduct) -> ProductResult<Option<Product>>;

    /// Remove and return the product, or `None` when nothing has this id.
    async fn delete(&self, id: &str) -> ProductResult<Option<Product>>;
}
