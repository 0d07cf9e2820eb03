//! Role-based access control: resolution, caching and enforcement.

pub mod cache;
pub mod gate;
pub mod resolver;

pub use cache::{PERMISSION_CACHE_TTL, PermissionCache, PermissionSnapshot};
pub use gate::{Requirement, authorize};
pub use resolver::{PermissionResolver, ResolvedGrants};
