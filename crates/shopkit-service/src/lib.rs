//! # shopkit-service
//!
//! Business logic service layer for shopkit. Each service orchestrates
//! stores, the cache and the auth primitives to implement one group of
//! use cases.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod account;
pub mod admin;
pub mod catalog;
pub mod context;
pub mod order;
pub mod registry;

pub use account::{AccountService, AuthOutcome, MeView, RegisterInput};
pub use admin::{AdminService, UserAccess};
pub use catalog::CatalogService;
pub use context::Principal;
pub use order::{OrderLineInput, OrderService, PlaceOrderInput};
pub use registry::ServiceRegistry;
