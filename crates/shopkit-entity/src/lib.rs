//! # shopkit-entity
//!
//! Domain entity models for shopkit. Every struct in this crate represents
//! a database table row, a value object, or a typed query filter. Row
//! types derive `sqlx::FromRow`.

pub mod catalog;
pub mod order;
pub mod rbac;
pub mod session;
mod status;
pub mod user;
