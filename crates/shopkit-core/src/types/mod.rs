//! Core type definitions used across the shopkit workspace.

pub mod id;
pub mod pagination;
pub mod query;
pub mod response;
pub mod sorting;

pub use id::*;
pub use pagination::{PageRequest, PageResponse};
pub use query::QuerySpec;
pub use response::ApiErrorResponse;
pub use sorting::{SortDirection, SortField};
