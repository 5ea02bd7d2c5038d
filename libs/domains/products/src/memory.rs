//! In-process ProductRepository.
//!
//! Keeps products in insertion order behind an async lock. Ids are fresh
//! ObjectIds, so the same ids are accepted and rejected as with MongoDB.

use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, UpdateProduct};
use crate::query::{Pagination, ProductFilter};
use crate::repository::ProductRepository;

#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalise `id` to the hex form stored on products.
    fn parse_id(id: &str) -> ProductResult<String> {
        Ok(ObjectId::parse_str(id)?.to_hex())
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: ObjectId::new().to_hex(),
            name: input.name,
            description: input.description,
            price: input.price,
            category: input.category,
            created_at: now,
            updated_at: now,
        };

        self.products.write().await.push(product.clone());

        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> ProductResult<Option<Product>> {
        let id = Self::parse_id(id)?;
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        filter: &ProductFilter,
        pagination: &Pagination,
    ) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|p| filter.matches(p))
            .skip(usize::try_from(pagination.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(pagination.limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: &ProductFilter) -> ProductResult<u64> {
        let products = self.products.read().await;
        Ok(products.iter().filter(|p| filter.matches(p)).count() as u64)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: &str, input: UpdateProduct) -> ProductResult<Option<Product>> {
        let id = Self::parse_id(id)?;
        let mut products = self.products.write().await;

        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        input.apply_to(product);
        product.updated_at = Utc::now();

        tracing::info!(product_id = %id, "Product updated");
        Ok(Some(product.clone()))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> ProductResult<Option<Product>> {
        let id = Self::parse_id(id)?;
        let mut products = self.products.write().await;

        let Some(index) = products.iter().position(|p| p.id == id) else {
            return Ok(None);
        };
        let removed = products.remove(index);

        tracing::info!(product_id = %id, "Product deleted");
        Ok(Some(removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProductError;
    use crate::models::ProductCategory;
    use crate::query::ProductField;
    use std::time::Duration;

    fn input(name: &str, category: ProductCategory, price: &str) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            description: format!("{name} description"),
            price: price.to_string(),
            category,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let repo = InMemoryProductRepository::new();
        let created = repo
            .create(input("Apple", ProductCategory::Fruit, "1.00"))
            .await
            .unwrap();

        assert_eq!(created.id.len(), 24);
        assert_eq!(created.created_at, created.updated_at);

        let fetched = repo.get_by_id(&created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_malformed_id_is_store_error() {
        let repo = InMemoryProductRepository::new();
        assert!(matches!(
            repo.get_by_id("nope").await,
            Err(ProductError::Store(_))
        ));
        assert!(matches!(
            repo.update("nope", UpdateProduct::default()).await,
            Err(ProductError::Store(_))
        ));
        assert!(matches!(repo.delete("nope").await, Err(ProductError::Store(_))));
    }

    #[tokio::test]
    async fn test_missing_id_yields_none() {
        let repo = InMemoryProductRepository::new();
        let id = ObjectId::new().to_hex();

        assert_eq!(repo.get_by_id(&id).await.unwrap(), None);
        assert_eq!(
            repo.update(&id, UpdateProduct::default()).await.unwrap(),
            None
        );
        assert_eq!(repo.delete(&id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_filters_and_pages_in_insertion_order() {
        let repo = InMemoryProductRepository::new();
        for i in 0..12 {
            repo.create(input(&format!("Item {i:02}"), ProductCategory::Grain, "1"))
                .await
                .unwrap();
        }
        repo.create(input("Potato", ProductCategory::Tuber, "2"))
            .await
            .unwrap();

        let grains = ProductFilter::all().with(ProductField::Category, "grain");
        assert_eq!(repo.count(&grains).await.unwrap(), 12);

        let second = repo.list(&grains, &Pagination::page(2)).await.unwrap();
        let names: Vec<_> = second.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Item 10", "Item 11"]);
    }

    #[tokio::test]
    async fn test_update_refreshes_updated_at_only() {
        let repo = InMemoryProductRepository::new();
        let created = repo
            .create(input("Rice", ProductCategory::Grain, "3.00"))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;

        let updated = repo
            .update(
                &created.id,
                UpdateProduct {
                    price: Some("5.00".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.price, "5.00");
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn test_delete_removes_product() {
        let repo = InMemoryProductRepository::new();
        let created = repo
            .create(input("Potato", ProductCategory::Tuber, "2.00"))
            .await
            .unwrap();

        let removed = repo.delete(&created.id).await.unwrap();
        assert_eq!(removed.as_ref().map(|p| p.id.as_str()), Some(created.id.as_str()));
        assert_eq!(repo.get_by_id(&created.id).await.unwrap(), None);
        assert_eq!(repo.count(&ProductFilter::all()).await.unwrap(), 0);
    }
}
