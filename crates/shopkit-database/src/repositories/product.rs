//! Product repository implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use shopkit_core::error::{AppError, ErrorKind};
use shopkit_core::result::AppResult;
use shopkit_core::types::{PageResponse, QuerySpec};
use shopkit_entity::catalog::{CreateProduct, PRODUCT_SORT_FIELDS, Product, ProductFilter};

use crate::query::{checked_sort, contains_pattern, order_by_clause};
use crate::store::CatalogStore;

/// Repository for the product catalog.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Create a new product repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &[ProductFilter]) {
    let mut separator = " WHERE ";
    for filter in filters {
        qb.push(separator);
        separator = " AND ";
        match filter {
            ProductFilter::Category(id) => {
                qb.push("category_id = ").push_bind(*id);
            }
            ProductFilter::MinPrice(min) => {
                qb.push("price >= ").push_bind(*min);
            }
            ProductFilter::MaxPrice(max) => {
                qb.push("price <= ").push_bind(*max);
            }
            ProductFilter::Search(term) => {
                qb.push("name ILIKE ").push_bind(contains_pattern(term));
            }
            ProductFilter::InStock => {
                qb.push("stock_quantity > 0");
            }
        }
    }
}

#[async_trait]
impl CatalogStore for ProductRepository {
    async fn create_product(&self, data: &CreateProduct) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(
            "INSERT INTO products (category_id, name, slug, description, price, stock_quantity) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING *",
        )
        .bind(data.category_id)
        .bind(&data.name)
        .bind(&data.slug)
        .bind(&data.description)
        .bind(data.price)
        .bind(data.stock_quantity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("products_slug_key") =>
            {
                AppError::conflict(format!("Slug '{}' already exists", data.slug))
            }
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::not_found("Category not found")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create product", e),
        })
    }

    async fn list_products(
        &self,
        spec: &QuerySpec<ProductFilter>,
    ) -> AppResult<PageResponse<Product>> {
        let sort = checked_sort(spec.sort.as_ref(), PRODUCT_SORT_FIELDS)?;

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM products");
        push_filters(&mut count, &spec.filters);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count products", e)
            })?;

        let mut list = QueryBuilder::new("SELECT * FROM products");
        push_filters(&mut list, &spec.filters);
        list.push(order_by_clause(sort, "id ASC"));
        list.push(" LIMIT ")
            .push_bind(spec.page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(spec.page.offset() as i64);

        let products = list
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list products", e))?;

        Ok(PageResponse::new(products, &spec.page, total as u64))
    }
}
