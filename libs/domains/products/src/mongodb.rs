//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{self, Document, doc, oid::ObjectId},
    options::ReturnDocument,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, ProductCategory, UpdateProduct};
use crate::query::{Pagination, ProductFilter};
use crate::repository::ProductRepository;

pub const COLLECTION_NAME: &str = "products";

/// Stored layout of a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    description: String,
    price: String,
    category: ProductCategory,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

fn to_bson_datetime(at: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(at.timestamp_millis())
}

fn from_bson_datetime(at: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or_default()
}

impl ProductDocument {
    fn new(input: CreateProduct, now: DateTime<Utc>) -> Self {
        let now = to_bson_datetime(now);
        Self {
            id: ObjectId::new(),
            name: input.name,
            description: input.description,
            price: input.price,
            category: input.category,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<ProductDocument> for Product {
    fn from(doc: ProductDocument) -> Self {
        Product {
            id: doc.id.to_hex(),
            name: doc.name,
            description: doc.description,
            price: doc.price,
            category: doc.category,
            created_at: from_bson_datetime(doc.created_at),
            updated_at: from_bson_datetime(doc.updated_at),
        }
    }
}

/// `$set` body for a partial update, always touching `updatedAt`.
fn update_document(input: UpdateProduct, now: DateTime<Utc>) -> Document {
    let mut set = doc! { "updatedAt": to_bson_datetime(now) };
    if let Some(name) = input.name {
        set.insert("name", name);
    }
    if let Some(description) = input.description {
        set.insert("description", description);
    }
    if let Some(price) = input.price {
        set.insert("price", price);
    }
    if let Some(category) = input.category {
        set.insert("category", category.to_string());
    }
    doc! { "$set": set }
}

/// MongoDB implementation of the ProductRepository
pub struct MongoProductRepository {
    collection: Collection<ProductDocument>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, COLLECTION_NAME)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection(collection_name),
        }
    }

    fn id_filter(id: &str) -> ProductResult<Document> {
        let oid = ObjectId::parse_str(id)?;
        Ok(doc! { "_id": oid })
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let document = ProductDocument::new(input, Utc::now());
        self.collection.insert_one(&document).await?;

        tracing::info!(product_id = %document.id, "Product created");
        Ok(document.into())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> ProductResult<Option<Product>> {
        let filter = Self::id_filter(id)?;
        let document = self.collection.find_one(filter).await?;
        Ok(document.map(Product::from))
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        filter: &ProductFilter,
        pagination: &Pagination,
    ) -> ProductResult<Vec<Product>> {
        let cursor = self
            .collection
            .find(filter.to_document())
            .skip(pagination.skip)
            .limit(pagination.limit as i64)
            .await?;

        let documents: Vec<ProductDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: &ProductFilter) -> ProductResult<u64> {
        let total = self.collection.count_documents(filter.to_document()).await?;
        Ok(total)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: &str, input: UpdateProduct) -> ProductResult<Option<Product>> {
        let filter = Self::id_filter(id)?;
        let updated = self
            .collection
            .find_one_and_update(filter, update_document(input, Utc::now()))
            .return_document(ReturnDocument::After)
            .await?;

        if updated.is_some() {
            tracing::info!(product_id = %id, "Product updated");
        }
        Ok(updated.map(Product::from))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> ProductResult<Option<Product>> {
        let filter = Self::id_filter(id)?;
        let deleted = self.collection.find_one_and_delete(filter).await?;

        if deleted.is_some() {
            tracing::info!(product_id = %id, "Product deleted");
        }
        Ok(deleted.map(Product::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input() -> CreateProduct {
        CreateProduct {
            name: "Rice".to_string(),
            description: "Long grain".to_string(),
            price: "3.00".to_string(),
            category: ProductCategory::Grain,
        }
    }

    #[test]
    fn test_document_round_trips_through_bson() {
        let original = ProductDocument::new(create_input(), Utc::now());
        let raw = bson::to_document(&original).unwrap();

        assert!(raw.get_object_id("_id").is_ok());
        assert_eq!(raw.get_str("category").unwrap(), "Grain");
        assert!(raw.get_datetime("createdAt").is_ok());

        let back: ProductDocument = bson::from_document(raw).unwrap();
        let product = Product::from(back);
        assert_eq!(product.id, original.id.to_hex());
        assert_eq!(product.created_at, product.updated_at);
    }

    #[test]
    fn test_update_document_sets_only_supplied_fields() {
        let update = UpdateProduct {
            price: Some("5.00".to_string()),
            category: Some(ProductCategory::Fruit),
            ..Default::default()
        };
        let body = update_document(update, Utc::now());
        let set = body.get_document("$set").unwrap();

        assert_eq!(set.get_str("price").unwrap(), "5.00");
        assert_eq!(set.get_str("category").unwrap(), "Fruit");
        assert!(set.get_datetime("updatedAt").is_ok());
        assert!(!set.contains_key("name"));
        assert!(!set.contains_key("createdAt"));
    }

    #[test]
    fn test_id_filter_rejects_malformed_id() {
        assert!(MongoProductRepository::id_filter("123").is_err());
        let ok = MongoProductRepository::id_filter("6650f1c2a4b5c6d7e8f90123").unwrap();
        assert!(ok.get_object_id("_id").is_ok());
    }
}
