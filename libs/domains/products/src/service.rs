//! Product Service - catalog operations over a [`ProductRepository`]

use std::sync::Arc;
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, ProductList, UpdateProduct};
use crate::query::{ListQuery, Pagination, ProductFilter};
use crate::repository::ProductRepository;

/// Each method is a single store round-trip (list is count + fetch); store
/// failures propagate unchanged and are never retried.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Filter, count and page through products.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: ListQuery) -> ProductResult<ProductList> {
        let filter = ProductFilter::from_query(&query);
        let pagination = Pagination::from_query(&query);

        let total_products = self.repository.count(&filter).await?;
        let products = self.repository.list(&filter, &pagination).await?;

        Ok(ProductList {
            products,
            total_pages: Pagination::total_pages(total_products),
            total_products,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &str) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound)
    }

    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        self.repository.create(input).await
    }

    /// `Ok(None)` when no product has `id`.
    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        id: &str,
        input: UpdateProduct,
    ) -> ProductResult<Option<Product>> {
        self.repository.update(id, input).await
    }

    /// `Ok(None)` when no product has `id`.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &str) -> ProductResult<Option<Product>> {
        self.repository.delete(id).await
    }
}
