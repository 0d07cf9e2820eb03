//! Catalog listing and product creation.

use std::sync::Arc;

use tracing::info;

use shopkit_core::error::AppError;
use shopkit_core::result::AppResult;
use shopkit_core::types::{PageResponse, QuerySpec};
use shopkit_database::store::CatalogStore;
use shopkit_entity::catalog::{CreateProduct, Product, ProductFilter};

/// Handles catalog queries and management.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CatalogStore>,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService").finish_non_exhaustive()
    }
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    pub async fn list(&self, spec: &QuerySpec<ProductFilter>) -> AppResult<PageResponse<Product>> {
        self.catalog.list_products(spec).await
    }

    /// Create a product. A blank slug is derived from the name.
    pub async fn create(&self, mut data: CreateProduct) -> AppResult<Product> {
        data.name = data.name.trim().to_string();
        if data.name.is_empty() {
            return Err(AppError::validation("product name is required"));
        }
        if !data.price.is_finite() || data.price < 0.0 {
            return Err(AppError::validation("price must be a non-negative number"));
        }
        if data.stock_quantity < 0 {
            return Err(AppError::validation("stock quantity must not be negative"));
        }

        data.slug = if data.slug.trim().is_empty() {
            slugify(&data.name)
        } else {
            slugify(&data.slug)
        };
        if data.slug.is_empty() {
            return Err(AppError::validation("slug must contain letters or digits"));
        }

        let product = self.catalog.create_product(&data).await?;
        info!(product_id = %product.id, slug = %product.slug, "Product created");
        Ok(product)
    }
}

/// Lowercase ASCII alphanumerics joined by single dashes.
pub fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}
