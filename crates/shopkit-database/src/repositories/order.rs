//! Order repository implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use shopkit_core::error::{AppError, ErrorKind};
use shopkit_core::result::AppResult;
use shopkit_core::types::{PageResponse, QuerySpec};
use shopkit_entity::catalog::Product;
use shopkit_entity::order::{
    NewOrder, ORDER_SORT_FIELDS, Order, OrderFilter, OrderItem, OrderWithItems,
};

use crate::query::{checked_sort, order_by_clause};
use crate::store::OrderStore;

/// Repository for orders and their lines.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Create a new order repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &[OrderFilter]) {
    let mut separator = " WHERE ";
    for filter in filters {
        qb.push(separator);
        separator = " AND ";
        match filter {
            OrderFilter::User(id) => {
                qb.push("user_id = ").push_bind(*id);
            }
            OrderFilter::Status(status) => {
                qb.push("status = ").push_bind(*status);
            }
        }
    }
}

fn db_error(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, message, e)
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn place_order(&self, order: &NewOrder) -> AppResult<OrderWithItems> {
        let lines = order.merged_lines()?;
        let ids: Vec<i64> = lines.iter().map(|l| l.product_id.get()).collect();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        // Row locks keep concurrent orders from overselling.
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE id = ANY($1) ORDER BY id FOR UPDATE",
        )
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await
        .map_err(db_error("Failed to load order products"))?;

        let mut priced = Vec::with_capacity(lines.len());
        let mut total = 0.0;
        for line in &lines {
            let product = products
                .iter()
                .find(|p| p.id == line.product_id)
                .ok_or_else(|| {
                    AppError::not_found(format!("Product {} not found", line.product_id))
                })?;
            if !product.has_stock(line.quantity) {
                return Err(AppError::conflict(format!(
                    "Insufficient stock for product {}",
                    product.id
                )));
            }
            total += product.price * f64::from(line.quantity);
            priced.push((line, product.price));
        }

        for (line, _) in &priced {
            sqlx::query(
                "UPDATE products SET stock_quantity = stock_quantity - $2, updated_at = NOW() \
                 WHERE id = $1",
            )
            .bind(line.product_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to reserve stock"))?;
        }

        let created = sqlx::query_as::<_, Order>(
            "INSERT INTO orders (user_id, total_price, payment_method, shipping_address) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(order.user_id)
        .bind(total)
        .bind(&order.payment_method)
        .bind(&order.shipping_address)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to create order"))?;

        let mut items = Vec::with_capacity(priced.len());
        for (line, unit_price) in priced {
            let item = sqlx::query_as::<_, OrderItem>(
                "INSERT INTO order_items (order_id, product_id, quantity, unit_price) \
                 VALUES ($1, $2, $3, $4) RETURNING *",
            )
            .bind(created.id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(unit_price)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error("Failed to create order item"))?;
            items.push(item);
        }

        tx.commit()
            .await
            .map_err(db_error("Failed to commit order"))?;

        Ok(OrderWithItems {
            order: created,
            items,
        })
    }

    async fn list_orders(&self, spec: &QuerySpec<OrderFilter>) -> AppResult<PageResponse<Order>> {
        let sort = checked_sort(spec.sort.as_ref(), ORDER_SORT_FIELDS)?;

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM orders");
        push_filters(&mut count, &spec.filters);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count orders"))?;

        let mut list = QueryBuilder::new("SELECT * FROM orders");
        push_filters(&mut list, &spec.filters);
        list.push(order_by_clause(sort, "created_at DESC, id DESC"));
        list.push(" LIMIT ")
            .push_bind(spec.page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(spec.page.offset() as i64);

        let orders = list
            .build_query_as::<Order>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list orders"))?;

        Ok(PageResponse::new(orders, &spec.page, total as u64))
    }
}
