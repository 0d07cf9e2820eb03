//! PostgreSQL implementations of the data-access traits.

pub mod order;
pub mod product;
pub mod rbac;
pub mod session;
pub mod user;

pub use order::OrderRepository;
pub use product::ProductRepository;
pub use rbac::RbacRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
