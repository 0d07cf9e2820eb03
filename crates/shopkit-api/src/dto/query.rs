//! Query-string filters for list endpoints.
//!
//! Paging and sorting come separately through
//! [`ListParams`](crate::extractors::ListParams).

use serde::Deserialize;

use shopkit_core::types::{CategoryId, UserId};
use shopkit_entity::catalog::ProductFilter;
use shopkit_entity::order::{OrderFilter, OrderStatus};
use shopkit_entity::user::{UserFilter, UserStatus};

/// `GET /admin/users` filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    pub status: Option<UserStatus>,
    /// Substring of the email address.
    pub email: Option<String>,
}

impl UserListQuery {
    pub fn filters(self) -> Vec<UserFilter> {
        let mut filters = Vec::new();
        if let Some(status) = self.status {
            filters.push(UserFilter::Status(status));
        }
        if let Some(email) = non_blank(self.email) {
            filters.push(UserFilter::EmailContains(email));
        }
        filters
    }
}

/// Catalog filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductListQuery {
    pub category_id: Option<CategoryId>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub search: Option<String>,
    #[serde(default)]
    pub in_stock: bool,
}

impl ProductListQuery {
    pub fn filters(self) -> Vec<ProductFilter> {
        let mut filters = Vec::new();
        if let Some(id) = self.category_id {
            filters.push(ProductFilter::Category(id));
        }
        if let Some(min) = self.min_price {
            filters.push(ProductFilter::MinPrice(min));
        }
        if let Some(max) = self.max_price {
            filters.push(ProductFilter::MaxPrice(max));
        }
        if let Some(term) = non_blank(self.search) {
            filters.push(ProductFilter::Search(term));
        }
        if self.in_stock {
            filters.push(ProductFilter::InStock);
        }
        filters
    }
}

/// Order filters. `user_id` is ignored when listing one's own orders.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub user_id: Option<UserId>,
}

impl OrderListQuery {
    pub fn filters(self) -> Vec<OrderFilter> {
        let mut filters = Vec::new();
        if let Some(status) = self.status {
            filters.push(OrderFilter::Status(status));
        }
        if let Some(user_id) = self.user_id {
            filters.push(OrderFilter::User(user_id));
        }
        filters
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
