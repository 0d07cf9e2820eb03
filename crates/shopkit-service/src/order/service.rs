//! Order placement and listing.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use shopkit_core::error::AppError;
use shopkit_core::result::AppResult;
use shopkit_core::types::{PageResponse, ProductId, QuerySpec};
use shopkit_database::store::OrderStore;
use shopkit_entity::order::{NewOrder, NewOrderLine, Order, OrderFilter, OrderWithItems};

use crate::context::Principal;

/// One requested line of an order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderLineInput {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// An order as submitted by a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderInput {
    pub payment_method: String,
    pub shipping_address: String,
    pub items: Vec<OrderLineInput>,
}

/// Handles order use cases.
#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderStore>,
}

impl std::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderService").finish_non_exhaustive()
    }
}

impl OrderService {
    pub fn new(orders: Arc<dyn OrderStore>) -> Self {
        Self { orders }
    }

    /// Place an order for the caller. Prices and stock come from the catalog.
    pub async fn place(
        &self,
        principal: &Principal,
        input: PlaceOrderInput,
    ) -> AppResult<OrderWithItems> {
        if input.items.is_empty() {
            return Err(AppError::validation("an order needs at least one item"));
        }
        if input.items.iter().any(|line| line.quantity < 1) {
            return Err(AppError::validation("item quantity must be at least 1"));
        }

        let payment_method = input.payment_method.trim().to_string();
        let shipping_address = input.shipping_address.trim().to_string();
        if payment_method.is_empty() {
            return Err(AppError::validation("payment method is required"));
        }
        if shipping_address.is_empty() {
            return Err(AppError::validation("shipping address is required"));
        }

        let order = NewOrder {
            user_id: principal.user_id,
            payment_method,
            shipping_address,
            lines: input
                .items
                .iter()
                .map(|line| NewOrderLine {
                    product_id: line.product_id,
                    quantity: line.quantity,
                })
                .collect(),
        };
        order.merged_lines()?;

        let placed = self.orders.place_order(&order).await?;
        info!(
            user_id = %principal.user_id,
            order_id = %placed.order.id,
            total = placed.order.total_price,
            "Order placed"
        );
        Ok(placed)
    }

    /// Orders of the caller, narrowed further by `spec`.
    pub async fn list_own(
        &self,
        principal: &Principal,
        spec: QuerySpec<OrderFilter>,
    ) -> AppResult<PageResponse<Order>> {
        // The owner filter is always applied, whatever the caller asked for.
        let mut spec = spec;
        spec.filters.retain(|f| !matches!(f, OrderFilter::User(_)));
        let spec = spec.filter(OrderFilter::User(principal.user_id));
        self.orders.list_orders(&spec).await
    }

    /// Every order matching `spec`.
    pub async fn list_all(&self, spec: &QuerySpec<OrderFilter>) -> AppResult<PageResponse<Order>> {
        self.orders.list_orders(spec).await
    }
}
