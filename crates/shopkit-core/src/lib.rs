//! # shopkit-core
//!
//! Core crate for shopkit. Contains the configuration schema, typed
//! identifiers, query specifications, pagination types, the cache provider
//! trait and the unified error system.
//!
//! This crate has **no** internal dependencies on other shopkit crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
