//! # shopkit-database
//!
//! Data-access traits for every shopkit entity, the PostgreSQL
//! repositories implementing them, an in-memory implementation used by
//! tests and the `memory` backend, connection management, migrations and
//! reference data seeding.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod query;
pub mod reference;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{CatalogStore, OrderStore, RbacStore, SessionStore, Stores, UserStore};
