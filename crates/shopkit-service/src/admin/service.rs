//! Admin user management: listing, status changes and grant administration.
//!
//! Every mutation invalidates the target's permission snapshot.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use shopkit_auth::rbac::PermissionCache;
use shopkit_auth::session::SessionManager;
use shopkit_core::error::AppError;
use shopkit_core::result::AppResult;
use shopkit_core::types::{PageResponse, PermissionId, QuerySpec, RoleId, UserId};
use shopkit_database::store::{RbacStore, UserStore};
use shopkit_entity::rbac::{NewGrant, Permission, Role};
use shopkit_entity::user::{User, UserFilter, UserStatus, normalize_email};

use crate::context::Principal;

/// A user with the grants currently in effect for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccess {
    pub user: User,
    pub roles: BTreeSet<String>,
    pub permissions: BTreeSet<String>,
}

/// Handles administrative operations on users and their grants.
#[derive(Clone)]
pub struct AdminService {
    users: Arc<dyn UserStore>,
    rbac: Arc<dyn RbacStore>,
    sessions: SessionManager,
    permissions: PermissionCache,
}

impl std::fmt::Debug for AdminService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminService").finish_non_exhaustive()
    }
}

impl AdminService {
    /// Creates a new admin service.
    pub fn new(
        users: Arc<dyn UserStore>,
        rbac: Arc<dyn RbacStore>,
        sessions: SessionManager,
        permissions: PermissionCache,
    ) -> Self {
        Self {
            users,
            rbac,
            sessions,
            permissions,
        }
    }

    /// Lists users matching `spec`.
    pub async fn list_users(&self, spec: &QuerySpec<UserFilter>) -> AppResult<PageResponse<User>> {
        self.users.list(spec).await
    }

    /// Finds a user by email, failing with not-found.
    pub async fn user_by_email(&self, email: &str) -> AppResult<User> {
        self.users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| AppError::not_found(format!("no user with email {email}")))
    }

    async fn require_user(&self, user_id: UserId) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("user {user_id} not found")))
    }

    /// The live grants of a user, resolved without the cache.
    pub async fn user_access(&self, user_id: UserId) -> AppResult<UserAccess> {
        let user = self.require_user(user_id).await?;
        let snapshot = self.permissions.build(user_id).await?;
        Ok(UserAccess {
            user,
            roles: snapshot.roles,
            permissions: snapshot.permissions,
        })
    }

    /// Activate or deactivate a user. Deactivation ends every session.
    ///
    /// `actor` is `None` for changes made from the operator console.
    pub async fn update_status(
        &self,
        actor: Option<&Principal>,
        user_id: UserId,
        status: UserStatus,
    ) -> AppResult<User> {
        let user = self.users.update_status(user_id, status).await?;
        if status == UserStatus::Inactive {
            self.sessions.destroy_all_for_user(user_id).await?;
        }
        self.permissions.invalidate(user_id).await;

        info!(
            actor = ?actor.map(|a| a.user_id),
            user_id = %user_id,
            status = %status,
            "User status changed"
        );
        Ok(user)
    }

    /// Assign a role, reactivating an earlier assignment.
    pub async fn assign_role(
        &self,
        actor: &Principal,
        user_id: UserId,
        role_id: RoleId,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<()> {
        self.require_user(user_id).await?;
        self.rbac
            .assign_role(&NewGrant {
                user_id,
                target: role_id,
                granted_by: Some(actor.user_id),
                expires_at,
            })
            .await?;
        self.permissions.invalidate(user_id).await;

        info!(actor = %actor.user_id, user_id = %user_id, role_id = %role_id, "Role assigned");
        Ok(())
    }

    /// Remove a role assignment. Fails with not-found when none was active.
    pub async fn remove_role(
        &self,
        actor: &Principal,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<()> {
        if !self.rbac.remove_role(user_id, role_id).await? {
            return Err(AppError::not_found(format!(
                "role {role_id} is not assigned to user {user_id}"
            )));
        }
        self.permissions.invalidate(user_id).await;

        info!(actor = %actor.user_id, user_id = %user_id, role_id = %role_id, "Role removed");
        Ok(())
    }

    /// Grant a permission directly, reactivating an earlier grant.
    pub async fn grant_permission(
        &self,
        actor: &Principal,
        user_id: UserId,
        permission_id: PermissionId,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<()> {
        self.require_user(user_id).await?;
        self.rbac
            .grant_permission(&NewGrant {
                user_id,
                target: permission_id,
                granted_by: Some(actor.user_id),
                expires_at,
            })
            .await?;
        self.permissions.invalidate(user_id).await;

        info!(
            actor = %actor.user_id,
            user_id = %user_id,
            permission_id = %permission_id,
            "Permission granted"
        );
        Ok(())
    }

    /// Revoke a direct grant. Fails with not-found when none was active.
    pub async fn revoke_permission(
        &self,
        actor: &Principal,
        user_id: UserId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        if !self.rbac.revoke_permission(user_id, permission_id).await? {
            return Err(AppError::not_found(format!(
                "permission {permission_id} is not granted to user {user_id}"
            )));
        }
        self.permissions.invalidate(user_id).await;

        info!(
            actor = %actor.user_id,
            user_id = %user_id,
            permission_id = %permission_id,
            "Permission revoked"
        );
        Ok(())
    }

    pub async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.rbac.list_roles().await
    }

    pub async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        self.rbac.list_permissions().await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use shopkit_core::ErrorKind;

    use super::*;
    use crate::test_support::{register_input, registry};

    async fn setup() -> (crate::ServiceRegistry, Principal, UserId) {
        let services = registry().await;
        let admin = services
            .accounts
            .register(register_input("admin@example.com", "admin-password"), None)
            .await
            .unwrap();
        let target = services
            .accounts
            .register(register_input("target@example.com", "target-password"), None)
            .await
            .unwrap();
        (
            services,
            Principal::new(&admin.session.session),
            target.user.id,
        )
    }

    async fn role_id(services: &crate::ServiceRegistry, name: &str) -> RoleId {
        services
            .admin
            .list_roles()
            .await
            .unwrap()
            .into_iter()
            .find(|r| r.name == name)
            .unwrap()
            .id
    }

    async fn permission_id(services: &crate::ServiceRegistry, name: &str) -> PermissionId {
        services
            .admin
            .list_permissions()
            .await
            .unwrap()
            .into_iter()
            .find(|p| p.name == name)
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_assign_role_invalidates_cached_snapshot() {
        let (services, actor, target) = setup().await;

        // Warm the cache.
        let before = services.permissions.load(target).await.unwrap();
        assert!(!before.has_role("manager"));

        let manager = role_id(&services, "manager").await;
        services
            .admin
            .assign_role(&actor, target, manager, None)
            .await
            .unwrap();

        let after = services.permissions.load(target).await.unwrap();
        assert!(after.has_role("manager"));
        assert!(after.has_permission("product:create"));

        services.admin.remove_role(&actor, target, manager).await.unwrap();
        let removed = services.permissions.load(target).await.unwrap();
        assert!(!removed.has_role("manager"));

        let err = services
            .admin
            .remove_role(&actor, target, manager)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_grant_and_revoke_permission() {
        let (services, actor, target) = setup().await;
        let read_all = permission_id(&services, "order:read_all").await;

        services
            .admin
            .grant_permission(&actor, target, read_all, Some(Utc::now() + Duration::hours(1)))
            .await
            .unwrap();
        let access = services.admin.user_access(target).await.unwrap();
        assert!(access.permissions.contains("order:read_all"));

        services
            .admin
            .revoke_permission(&actor, target, read_all)
            .await
            .unwrap();
        let access = services.admin.user_access(target).await.unwrap();
        assert!(!access.permissions.contains("order:read_all"));
    }

    #[tokio::test]
    async fn test_unknown_user_or_role_is_not_found() {
        let (services, actor, target) = setup().await;
        let manager = role_id(&services, "manager").await;

        let err = services
            .admin
            .assign_role(&actor, UserId::new(9999), manager, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let err = services
            .admin
            .assign_role(&actor, target, RoleId::new(9999), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_deactivation_ends_sessions() {
        let (services, actor, _) = setup().await;
        let victim = services
            .accounts
            .register(register_input("victim@example.com", "victim-password"), None)
            .await
            .unwrap();

        let user = services
            .admin
            .update_status(Some(&actor), victim.user.id, UserStatus::Inactive)
            .await
            .unwrap();
        assert_eq!(user.status, UserStatus::Inactive);
        assert!(services
            .accounts
            .authenticate(&victim.session.token)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_users_filters_by_email() {
        let (services, _, _) = setup().await;
        let spec = QuerySpec::new().filter(UserFilter::EmailContains("target".to_string()));
        let page = services.admin.list_users(&spec).await.unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].email, "target@example.com");

        assert_eq!(
            services.admin.user_by_email("TARGET@example.com").await.unwrap().email,
            "target@example.com"
        );
    }
}
