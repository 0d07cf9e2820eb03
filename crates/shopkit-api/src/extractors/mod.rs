//! Custom Axum extractors.

pub mod auth;
pub mod json;
pub mod pagination;
pub mod token;

pub use auth::AuthUser;
pub use json::ValidatedJson;
pub use pagination::ListParams;
pub use token::{SessionToken, presented_token};
