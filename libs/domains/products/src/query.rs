//! List filtering and pagination.
//!
//! Only the fields in [`ProductField`] can be filtered on. Each supplied,
//! non-empty value becomes a case-insensitive literal substring match; all
//! matches must hold.

use mongodb::bson::{Document, doc};
use serde::{Deserialize, Deserializer};
use std::borrow::Cow;
use strum::{Display, IntoStaticStr};
use utoipa::IntoParams;

use crate::models::Product;

/// Fixed page size for `GET /products`.
pub const RES_PER_PAGE: u64 = 10;

/// Highest page whose skip still fits the store's signed 64-bit skip.
pub const MAX_PAGE: u64 = i64::MAX as u64 / RES_PER_PAGE + 1;

/// Query string accepted by `GET /products`. Other keys are ignored.
///
/// A repeated filter key keeps its last value. A repeated `page` is not a
/// single integer and so resolves to page 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    /// Case-insensitive substring of the description
    pub description: Option<String>,
    /// Substring of the price text
    pub price: Option<String>,
    /// Substring of the category, e.g. `fru`
    pub category: Option<String>,
    /// 1-based page; missing or invalid values mean page 1
    pub page: Option<String>,
}

impl ListQuery {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        let mut pages = 0usize;

        for (key, value) in pairs {
            match key.as_str() {
                "name" => query.name = Some(value),
                "description" => query.description = Some(value),
                "price" => query.price = Some(value),
                "category" => query.category = Some(value),
                "page" => {
                    pages += 1;
                    query.page = Some(value);
                }
                _ => {}
            }
        }

        if pages > 1 {
            query.page = None;
        }
        query
    }
}

impl<'de> Deserialize<'de> for ListQuery {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let pairs = Vec::<(String, String)>::deserialize(deserializer)?;
        Ok(Self::from_pairs(pairs))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ProductField {
    Name,
    Description,
    Price,
    Category,
}

impl ProductField {
    /// Document key holding this field.
    pub fn key(self) -> &'static str {
        self.into()
    }

    fn value_of(self, product: &Product) -> Cow<'_, str> {
        match self {
            ProductField::Name => Cow::Borrowed(&product.name),
            ProductField::Description => Cow::Borrowed(&product.description),
            ProductField::Price => Cow::Borrowed(&product.price),
            ProductField::Category => Cow::Owned(product.category.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    pub field: ProductField,
    pub needle: String,
}

impl FieldMatch {
    pub fn matches(&self, product: &Product) -> bool {
        self.field
            .value_of(product)
            .to_lowercase()
            .contains(&self.needle.to_lowercase())
    }

    fn to_condition(&self) -> Document {
        doc! {
            "$regex": regex::escape(&self.needle),
            "$options": "i",
        }
    }
}

/// Conjunction of [`FieldMatch`]es. The empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    matches: Vec<FieldMatch>,
}

impl ProductFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Add a match on `field`. Empty needles are skipped; a second match on
    /// the same field replaces the first.
    pub fn with(mut self, field: ProductField, needle: impl Into<String>) -> Self {
        let needle = needle.into();
        if needle.is_empty() {
            return self;
        }
        self.matches.retain(|m| m.field != field);
        self.matches.push(FieldMatch { field, needle });
        self
    }

    pub fn from_query(query: &ListQuery) -> Self {
        let supplied = [
            (ProductField::Name, &query.name),
            (ProductField::Description, &query.description),
            (ProductField::Price, &query.price),
            (ProductField::Category, &query.category),
        ];

        supplied
            .into_iter()
            .fold(Self::all(), |filter, (field, value)| match value {
                Some(needle) => filter.with(field, needle.as_str()),
                None => filter,
            })
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn field_matches(&self) -> &[FieldMatch] {
        &self.matches
    }

    /// MongoDB filter document equivalent to [`matches`](Self::matches).
    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();
        for m in &self.matches {
            filter.insert(m.field.key(), m.to_condition());
        }
        filter
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.matches.iter().all(|m| m.matches(product))
    }
}

/// Resolved page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u64,
    pub skip: u64,
    pub limit: u64,
}

impl Pagination {
    /// Window for a 1-based page. Page 0 is treated as page 1 and pages
    /// past [`MAX_PAGE`] as [`MAX_PAGE`].
    pub fn page(page: u64) -> Self {
        let current_page = page.clamp(1, MAX_PAGE);
        Self {
            current_page,
            skip: RES_PER_PAGE * (current_page - 1),
            limit: RES_PER_PAGE,
        }
    }

    /// Parse the raw `page` parameter. Anything that is not a positive
    /// integer resolves to page 1.
    pub fn from_param(raw: Option<&str>) -> Self {
        let page = raw
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|n| *n > 0)
            .map_or(1, |n| n as u64);
        Self::page(page)
    }

    pub fn from_query(query: &ListQuery) -> Self {
        Self::from_param(query.page.as_deref())
    }

    pub fn total_pages(total: u64) -> u64 {
        total.div_ceil(RES_PER_PAGE)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::page(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductCategory;
    use chrono::Utc;

    fn product(name: &str, category: ProductCategory, price: &str) -> Product {
        let now = Utc::now();
        Product {
            id: String::new(),
            name: name.to_string(),
            description: format!("{name} description"),
            price: price.to_string(),
            category,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_query_has_no_predicates() {
        let filter = ProductFilter::from_query(&ListQuery::default());
        assert!(filter.is_empty());
        assert!(filter.to_document().is_empty());
        assert!(filter.matches(&product("Apple", ProductCategory::Fruit, "1.00")));
    }

    #[test]
    fn test_blank_values_are_skipped() {
        let query = ListQuery {
            name: Some(String::new()),
            category: Some("Fruit".to_string()),
            ..Default::default()
        };
        let filter = ProductFilter::from_query(&query);
        assert_eq!(filter.field_matches().len(), 1);
        assert_eq!(filter.field_matches()[0].field, ProductField::Category);
    }

    #[test]
    fn test_to_document_escapes_needle() {
        let filter = ProductFilter::all().with(ProductField::Price, "1.0");
        let expected = doc! { "price": { "$regex": "1\\.0", "$options": "i" } };
        assert_eq!(filter.to_document(), expected);
    }

    #[test]
    fn test_matches_is_case_insensitive_and_conjunctive() {
        let apple = product("Apple", ProductCategory::Fruit, "1.00");
        let pie = product("apple pie", ProductCategory::Grain, "4.50");

        let by_name = ProductFilter::all().with(ProductField::Name, "APPLE");
        assert!(by_name.matches(&apple));
        assert!(by_name.matches(&pie));

        let narrowed = by_name.with(ProductField::Category, "fruit");
        assert!(narrowed.matches(&apple));
        assert!(!narrowed.matches(&pie));
    }

    #[test]
    fn test_regex_metacharacters_match_literally() {
        let dotted = product("a.b", ProductCategory::Fruit, "1");
        let plain = product("axb", ProductCategory::Fruit, "1");
        let filter = ProductFilter::all().with(ProductField::Name, ".");
        assert!(filter.matches(&dotted));
        assert!(!filter.matches(&plain));
    }

    #[test]
    fn test_later_match_replaces_earlier_on_same_field() {
        let filter = ProductFilter::all()
            .with(ProductField::Name, "apple")
            .with(ProductField::Name, "rice");
        assert_eq!(filter.field_matches().len(), 1);
        assert_eq!(filter.field_matches()[0].needle, "rice");
    }

    #[test]
    fn test_pagination_from_param() {
        assert_eq!(Pagination::from_param(None).current_page, 1);
        assert_eq!(Pagination::from_param(Some("")).current_page, 1);
        assert_eq!(Pagination::from_param(Some("abc")).current_page, 1);
        assert_eq!(Pagination::from_param(Some("0")).current_page, 1);
        assert_eq!(Pagination::from_param(Some("-1")).skip, 0);

        let third = Pagination::from_param(Some(" 3 "));
        assert_eq!(third.current_page, 3);
        assert_eq!(third.skip, 20);
        assert_eq!(third.limit, RES_PER_PAGE);
    }

    #[test]
    fn test_huge_page_skip_fits_i64() {
        let huge = Pagination::from_param(Some("922337203685477590"));
        assert_eq!(huge.current_page, MAX_PAGE);
        assert!(huge.skip <= i64::MAX as u64);

        let max = Pagination::page(u64::MAX);
        assert_eq!(max, huge);
        assert!(i64::try_from(max.skip).is_ok());
    }

    #[test]
    fn test_list_query_from_pairs() {
        let pairs = [
            ("name", "apple"),
            ("colour", "red"),
            ("name", "pie"),
            ("page", "2"),
        ]
        .map(|(k, v)| (k.to_string(), v.to_string()));
        let query = ListQuery::from_pairs(pairs);

        assert_eq!(query.name.as_deref(), Some("pie"));
        assert_eq!(query.page.as_deref(), Some("2"));
        assert_eq!(query.description, None);
    }

    #[test]
    fn test_repeated_page_resolves_to_first_page() {
        let pairs = [("page", "1"), ("page", "2")].map(|(k, v)| (k.to_string(), v.to_string()));
        let query = ListQuery::from_pairs(pairs);

        assert_eq!(query.page, None);
        assert_eq!(Pagination::from_query(&query).current_page, 1);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(Pagination::total_pages(0), 0);
        assert_eq!(Pagination::total_pages(1), 1);
        assert_eq!(Pagination::total_pages(10), 1);
        assert_eq!(Pagination::total_pages(15), 2);
        assert_eq!(Pagination::total_pages(20), 2);
    }

    #[test]
    fn test_field_keys() {
        assert_eq!(ProductField::Name.key(), "name");
        assert_eq!(ProductField::Category.key(), "category");
    }
}
