//! User grants and the typed specification of grant lookups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopkit_core::types::{PermissionId, RoleId, UserId};
use sqlx::FromRow;

/// Assignment of a role to a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRole {
    pub user_id: UserId,
    pub role_id: RoleId,
    /// The user who made the assignment.
    pub assigned_by: Option<UserId>,
    pub assigned_at: DateTime<Utc>,
    /// Grant stops counting at this instant.
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl UserRole {
    /// Whether the assignment counts at `now`.
    pub fn is_effective(&self, now: DateTime<Utc>) -> bool {
        is_effective(self.is_active, self.expires_at, now)
    }
}

/// Direct grant of a permission to a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserPermission {
    pub user_id: UserId,
    pub permission_id: PermissionId,
    /// The user who made the grant.
    pub granted_by: Option<UserId>,
    pub granted_at: DateTime<Utc>,
    /// Grant stops counting at this instant.
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl UserPermission {
    /// Whether the grant counts at `now`.
    pub fn is_effective(&self, now: DateTime<Utc>) -> bool {
        is_effective(self.is_active, self.expires_at, now)
    }
}

fn is_effective(is_active: bool, expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    is_active && expires_at.is_none_or(|at| at > now)
}

/// Input for assigning a role or granting a permission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGrant<T> {
    pub user_id: UserId,
    /// The role or permission being granted.
    pub target: T,
    pub granted_by: Option<UserId>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Which relation chain leads from a user to permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrantPath {
    /// `user_permissions -> permissions`.
    Direct,
    /// `user_roles -> roles -> role_permissions -> permissions`.
    ViaRoles,
}

/// Typed description of an effective-grant lookup.
///
/// Only active grants that have not expired at `as_of` match. Along the
/// [`GrantPath::ViaRoles`] path the role itself must also be active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantSpec {
    pub user_id: UserId,
    pub path: GrantPath,
    /// Instant the expiry check is evaluated against.
    pub as_of: DateTime<Utc>,
}

impl GrantSpec {
    /// Direct grants of `user_id` effective now.
    pub fn direct(user_id: UserId) -> Self {
        Self {
            user_id,
            path: GrantPath::Direct,
            as_of: Utc::now(),
        }
    }

    /// Role-derived grants of `user_id` effective now.
    pub fn via_roles(user_id: UserId) -> Self {
        Self {
            user_id,
            path: GrantPath::ViaRoles,
            as_of: Utc::now(),
        }
    }

    /// Evaluate expiry at a fixed instant instead of now.
    pub fn at(mut self, as_of: DateTime<Utc>) -> Self {
        self.as_of = as_of;
        self
    }
}
