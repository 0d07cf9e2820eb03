//! Product catalog entities.

pub mod product;

pub use product::{CreateProduct, PRODUCT_SORT_FIELDS, Product, ProductFilter};
