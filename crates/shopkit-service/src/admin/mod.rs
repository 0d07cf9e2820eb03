//! Administrative user and access management.

pub mod service;

pub use service::{AdminService, UserAccess};
