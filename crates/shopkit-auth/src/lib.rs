//! # shopkit-auth
//!
//! Authentication and authorization for shopkit.
//!
//! ## Modules
//!
//! - `password` — Argon2id password hashing and policy enforcement
//! - `session` — Opaque session tokens, issue, rotation and destruction
//! - `rbac` — Permission resolution, the permission cache and the authorization gate

pub mod password;
pub mod rbac;
pub mod session;

pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::{PermissionCache, PermissionResolver, PermissionSnapshot, Requirement};
pub use session::{IssuedSession, SessionManager, SessionSweeper};
