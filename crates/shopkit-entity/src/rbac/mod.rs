//! Roles, permissions and the grants binding them to users.

pub mod grant;
pub mod permission;
pub mod role;

pub use grant::{GrantPath, GrantSpec, NewGrant, UserPermission, UserRole};
pub use permission::{Permission, WILDCARD_PERMISSION};
pub use role::Role;
