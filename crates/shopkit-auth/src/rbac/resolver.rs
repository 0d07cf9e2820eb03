//! Effective permission resolution over the RBAC graph.
//!
//! The effective set of a user is the union of
//! 1. direct grants that are active and unexpired, and
//! 2. permissions of active roles held through active, unexpired assignments.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopkit_core::result::AppResult;
use shopkit_core::types::UserId;
use shopkit_database::store::RbacStore;
use shopkit_entity::rbac::GrantSpec;

/// Role and permission names in effect for a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedGrants {
    pub roles: BTreeSet<String>,
    pub permissions: BTreeSet<String>,
}

/// Computes [`ResolvedGrants`] from the store. Never caches.
#[derive(Clone)]
pub struct PermissionResolver {
    rbac: Arc<dyn RbacStore>,
}

impl std::fmt::Debug for PermissionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionResolver").finish()
    }
}

impl PermissionResolver {
    pub fn new(rbac: Arc<dyn RbacStore>) -> Self {
        Self { rbac }
    }

    /// Resolve the grants of `user_id` in effect now.
    pub async fn resolve(&self, user_id: UserId) -> AppResult<ResolvedGrants> {
        self.resolve_at(user_id, Utc::now()).await
    }

    /// Resolve the grants of `user_id` in effect at `as_of`.
    ///
    /// Any store error aborts resolution.
    pub async fn resolve_at(
        &self,
        user_id: UserId,
        as_of: DateTime<Utc>,
    ) -> AppResult<ResolvedGrants> {
        let via_roles = GrantSpec::via_roles(user_id).at(as_of);
        let direct = GrantSpec::direct(user_id).at(as_of);

        let roles = self.rbac.granted_roles(&via_roles).await?;
        let role_permissions = self.rbac.granted_permissions(&via_roles).await?;
        let direct_permissions = self.rbac.granted_permissions(&direct).await?;

        Ok(ResolvedGrants {
            roles: roles.into_iter().map(|r| r.name).collect(),
            permissions: role_permissions
                .into_iter()
                .chain(direct_permissions)
                .map(|p| p.name)
                .collect(),
        })
    }
}
