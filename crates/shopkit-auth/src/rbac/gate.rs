//! Route requirements and the decision whether a snapshot meets them.

use std::fmt;

use shopkit_core::error::AppError;
use shopkit_core::result::AppResult;

use super::cache::PermissionSnapshot;

/// What a protected route demands of the caller.
///
/// An empty list is never satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Membership in at least one of the roles.
    AnyRole(Vec<String>),
    /// At least one of the permissions, `*:*` matching all.
    AnyPermission(Vec<String>),
}

impl Requirement {
    pub fn any_role(roles: &[&str]) -> Self {
        Self::AnyRole(roles.iter().map(|r| r.to_string()).collect())
    }

    pub fn any_permission(permissions: &[&str]) -> Self {
        Self::AnyPermission(permissions.iter().map(|p| p.to_string()).collect())
    }

    pub fn is_satisfied_by(&self, snapshot: &PermissionSnapshot) -> bool {
        match self {
            Self::AnyRole(roles) => snapshot.has_any_role(roles),
            Self::AnyPermission(permissions) => snapshot.has_any_permission(permissions),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AnyRole(roles) => write!(f, "role {}", roles.join("|")),
            Self::AnyPermission(permissions) => write!(f, "{}", permissions.join("|")),
        }
    }
}

/// Check `snapshot` against `requirement`, failing with an authorization error.
pub fn authorize(snapshot: &PermissionSnapshot, requirement: &Requirement) -> AppResult<()> {
    if requirement.is_satisfied_by(snapshot) {
        Ok(())
    } else {
        Err(AppError::authorization(format!("requires {requirement}")))
    }
}
