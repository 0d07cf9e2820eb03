//! User domain entities.

pub mod filter;
pub mod model;
pub mod status;

pub use filter::{USER_SORT_FIELDS, UserFilter};
pub use model::{CreateUser, User, normalize_email};
pub use status::UserStatus;
