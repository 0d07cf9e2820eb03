use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;

use shopkit_core::error::AppError;
use shopkit_core::result::AppResult;
use shopkit_core::types::{OrderId, OrderItemId, PageResponse, ProductId, QuerySpec};
use shopkit_entity::catalog::{CreateProduct, PRODUCT_SORT_FIELDS, Product, ProductFilter};
use shopkit_entity::order::{
    NewOrder, ORDER_SORT_FIELDS, Order, OrderFilter, OrderItem, OrderStatus, OrderWithItems,
};

use super::MemoryStore;
use crate::query::{checked_sort, directed, page_slice};
use crate::store::{CatalogStore, OrderStore};

fn compare_products(a: &Product, b: &Product, field: &str) -> Ordering {
    match field {
        "name" => a.name.cmp(&b.name),
        "price" => a.price.total_cmp(&b.price),
        "created_at" => a.created_at.cmp(&b.created_at),
        "avg_rating" => a.avg_rating.total_cmp(&b.avg_rating),
        _ => Ordering::Equal,
    }
    .then(a.id.cmp(&b.id))
}

fn compare_orders(a: &Order, b: &Order, field: &str) -> Ordering {
    match field {
        "created_at" => a.created_at.cmp(&b.created_at),
        "total_price" => a.total_price.total_cmp(&b.total_price),
        _ => Ordering::Equal,
    }
    .then(a.id.cmp(&b.id))
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn create_product(&self, data: &CreateProduct) -> AppResult<Product> {
        let mut tables = self.tables.write().await;
        if tables.products.values().any(|p| p.slug == data.slug) {
            return Err(AppError::conflict(format!(
                "Slug '{}' already exists",
                data.slug
            )));
        }
        let now = Utc::now();
        let product = Product {
            id: ProductId::new(tables.next_id()),
            category_id: data.category_id,
            name: data.name.clone(),
            slug: data.slug.clone(),
            description: data.description.clone(),
            price: data.price,
            stock_quantity: data.stock_quantity,
            avg_rating: 0.0,
            review_count: 0,
            created_at: now,
            updated_at: now,
        };
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn list_products(
        &self,
        spec: &QuerySpec<ProductFilter>,
    ) -> AppResult<PageResponse<Product>> {
        let sort = checked_sort(spec.sort.as_ref(), PRODUCT_SORT_FIELDS)?;
        let tables = self.tables.read().await;

        let mut products: Vec<Product> = tables
            .products
            .values()
            .filter(|p| spec.filters.iter().all(|f| f.matches(p)))
            .cloned()
            .collect();
        if let Some(sort) = sort {
            products.sort_by(|a, b| directed(compare_products(a, b, &sort.field), sort.direction));
        }

        let total = products.len() as u64;
        Ok(PageResponse::new(page_slice(products, &spec.page), &spec.page, total))
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn place_order(&self, order: &NewOrder) -> AppResult<OrderWithItems> {
        let lines = order.merged_lines()?;
        let mut tables = self.tables.write().await;

        // Validate everything before touching stock.
        let mut total = 0.0;
        for line in &lines {
            let product = tables
                .products
                .get(&line.product_id)
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
        }

        let now = Utc::now();
        let created = Order {
            id: OrderId::new(tables.next_id()),
            user_id: order.user_id,
            status: OrderStatus::Pending,
            total_price: total,
            payment_method: order.payment_method.clone(),
            shipping_address: order.shipping_address.clone(),
            created_at: now,
            updated_at: now,
        };

        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            let id = OrderItemId::new(tables.next_id());
            let Some(product) = tables.products.get_mut(&line.product_id) else {
                continue;
            };
            product.stock_quantity -= line.quantity;
            product.updated_at = now;
            items.push(OrderItem {
                id,
                order_id: created.id,
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: product.price,
            });
        }

        tables.orders.insert(created.id, created.clone());
        tables.order_items.extend(items.iter().cloned());
        Ok(OrderWithItems {
            order: created,
            items,
        })
    }

    async fn list_orders(&self, spec: &QuerySpec<OrderFilter>) -> AppResult<PageResponse<Order>> {
        let sort = checked_sort(spec.sort.as_ref(), ORDER_SORT_FIELDS)?;
        let tables = self.tables.read().await;

        let mut orders: Vec<Order> = tables
            .orders
            .values()
            .filter(|o| spec.filters.iter().all(|f| f.matches(o)))
            .cloned()
            .collect();
        match sort {
            Some(sort) => {
                orders.sort_by(|a, b| directed(compare_orders(a, b, &sort.field), sort.direction))
            }
            None => orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))),
        }

        let total = orders.len() as u64;
        Ok(PageResponse::new(page_slice(orders, &spec.page), &spec.page, total))
    }
}
