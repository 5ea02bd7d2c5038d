use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Product category
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum ProductCategory {
    Fruit,
    Tuber,
    Grain,
}

/// Product entity as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Store-assigned identifier (24-char hex ObjectId)
    #[serde(rename = "_id", alias = "id")]
    #[schema(example = "6650f1c2a4b5c6d7e8f90123")]
    pub id: String,
    pub name: String,
    pub description: String,
    /// Decimal kept as text; never compared numerically
    #[schema(example = "1.50")]
    pub price: String,
    pub category: ProductCategory,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /products/new`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreateProduct {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: ProductCategory,
}

/// Partial update; only supplied fields change
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<ProductCategory>,
}

impl UpdateProduct {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
    }

    /// Copy supplied fields onto `product`. Timestamps are left to the caller.
    pub fn apply_to(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
    }
}

/// One page of `GET /products`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductList {
    pub products: Vec<Product>,
    pub total_pages: u64,
    pub total_products: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn sample() -> Product {
        let now = Utc::now();
        Product {
            id: "6650f1c2a4b5c6d7e8f90123".to_string(),
            name: "Apple".to_string(),
            description: "Red".to_string(),
            price: "1.00".to_string(),
            category: ProductCategory::Fruit,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_product_json_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["_id"], "6650f1c2a4b5c6d7e8f90123");
        assert_eq!(value["category"], "Fruit");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn test_category_rejects_unknown_value() {
        let err = serde_json::from_value::<CreateProduct>(json!({
            "name": "Kale",
            "description": "Leafy",
            "price": "2.00",
            "category": "Vegetable"
        }));
        assert!(err.is_err());
        assert_eq!(ProductCategory::from_str("Tuber").unwrap(), ProductCategory::Tuber);
        assert_eq!(ProductCategory::Grain.to_string(), "Grain");
    }

    #[test]
    fn test_update_applies_only_supplied_fields() {
        let mut product = sample();
        let before = product.clone();

        UpdateProduct {
            price: Some("5.00".to_string()),
            ..Default::default()
        }
        .apply_to(&mut product);

        assert_eq!(product.price, "5.00");
        assert_eq!(product.name, before.name);
        assert_eq!(product.description, before.description);
        assert_eq!(product.category, before.category);
        assert_eq!(product.created_at, before.created_at);
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UpdateProduct::default().is_empty());
        let update: UpdateProduct = serde_json::from_value(json!({ "name": "Pear" })).unwrap();
        assert!(!update.is_empty());
    }
}
