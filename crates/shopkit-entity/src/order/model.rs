//! Order entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopkit_core::error::AppError;
use shopkit_core::result::AppResult;
use shopkit_core::types::{OrderId, OrderItemId, ProductId, UserId};
use sqlx::FromRow;

use super::status::OrderStatus;

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    /// Sum of `quantity * unit_price` over all lines.
    pub total_price: f64,
    pub payment_method: String,
    pub shipping_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of an order, priced at the time of purchase.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: f64,
}

/// An order together with its lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// A requested order line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewOrderLine {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Data required to place an order. Prices come from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub user_id: UserId,
    pub payment_method: String,
    pub shipping_address: String,
    pub lines: Vec<NewOrderLine>,
}

impl NewOrder {
    /// Lines with repeated products folded together, in first-seen order.
    ///
    /// A folded quantity that does not fit in `i32` is a validation error.
    pub fn merged_lines(&self) -> AppResult<Vec<NewOrderLine>> {
        let mut merged: Vec<NewOrderLine> = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            match merged.iter_mut().find(|m| m.product_id == line.product_id) {
                Some(existing) => {
                    existing.quantity = existing
                        .quantity
                        .checked_add(line.quantity)
                        .ok_or_else(|| AppError::validation("item quantity is too large"))?;
                }
                None => merged.push(*line),
            }
        }
        Ok(merged)
    }
}

/// One predicate of an order listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderFilter {
    User(UserId),
    Status(OrderStatus),
}

impl OrderFilter {
    /// Evaluate the predicate against a loaded order.
    pub fn matches(&self, order: &Order) -> bool {
        match self {
            Self::User(id) => order.user_id == *id,
            Self::Status(status) => order.status == *status,
        }
    }
}

/// Columns an order listing may be ordered by.
pub const ORDER_SORT_FIELDS: &[&str] = &["id", "created_at", "total_price"];
