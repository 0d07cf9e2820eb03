//! Cache key builders for every shopkit cache entry.
//!
//! Backends add their own namespace prefix, so keys here stay short.

use shopkit_core::types::UserId;

/// Key prefix of cached permission snapshots.
pub const USER_PERMISSIONS_PREFIX: &str = "user_perms:";

/// Cache key for the permission snapshot of a user.
pub fn user_permissions(user_id: UserId) -> String {
    format!("{USER_PERMISSIONS_PREFIX}{user_id}")
}

/// Pattern matching every cached permission snapshot.
pub fn user_permissions_pattern() -> String {
    format!("{USER_PERMISSIONS_PREFIX}*")
}

/// Cache key for the CSRF token bound to a session.
pub fn csrf(session_hash: &str) -> String {
    format!("csrf:{session_hash}")
}
