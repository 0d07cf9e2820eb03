//! Product entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopkit_core::types::{CategoryId, ProductId};
use sqlx::FromRow;

/// A sellable catalog item.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: ProductId,
    pub category_id: Option<CategoryId>,
    pub name: String,
    /// Unique URL slug.
    pub slug: String,
    pub description: Option<String>,
    /// Unit price.
    pub price: f64,
    pub stock_quantity: i32,
    pub avg_rating: f64,
    pub review_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether `quantity` units can be taken from stock.
    pub fn has_stock(&self, quantity: i32) -> bool {
        quantity > 0 && self.stock_quantity >= quantity
    }
}

/// Data required to create a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProduct {
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock_quantity: i32,
}

/// One predicate of a product listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProductFilter {
    Category(CategoryId),
    /// Price greater than or equal.
    MinPrice(f64),
    /// Price less than or equal.
    MaxPrice(f64),
    /// Case-insensitive substring of the name.
    Search(String),
    /// Stock quantity above zero.
    InStock,
}

impl ProductFilter {
    /// Evaluate the predicate against a loaded product.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::Category(id) => product.category_id == Some(*id),
            Self::MinPrice(min) => product.price >= *min,
            Self::MaxPrice(max) => product.price <= *max,
            Self::Search(term) => product
                .name
                .to_lowercase()
                .contains(&term.to_lowercase()),
            Self::InStock => product.stock_quantity > 0,
        }
    }
}

/// Columns a product listing may be ordered by.
pub const PRODUCT_SORT_FIELDS: &[&str] = &["id", "name", "price", "created_at", "avg_rating"];
