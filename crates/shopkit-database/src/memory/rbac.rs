use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;

use shopkit_core::error::AppError;
use shopkit_core::result::AppResult;
use shopkit_core::types::{PermissionId, RoleId, UserId};
use shopkit_entity::rbac::{
    GrantPath, GrantSpec, NewGrant, Permission, Role, UserPermission, UserRole,
};

use super::{MemoryStore, Tables};
use crate::store::RbacStore;

impl Tables {
    /// Active roles held through effective grants at `spec.as_of`.
    fn effective_roles(&self, spec: &GrantSpec) -> Vec<&Role> {
        self.user_roles
            .values()
            .filter(|g| g.user_id == spec.user_id && g.is_effective(spec.as_of))
            .filter_map(|g| self.roles.get(&g.role_id))
            .filter(|r| r.is_active)
            .collect()
    }
}

#[async_trait]
impl RbacStore for MemoryStore {
    async fn upsert_role(&self, name: &str, description: &str) -> AppResult<Role> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        if let Some(role) = tables.roles.values_mut().find(|r| r.name == name) {
            role.description = Some(description.to_string());
            role.updated_at = now;
            return Ok(role.clone());
        }
        let role = Role {
            id: RoleId::new(tables.next_id()),
            name: name.to_string(),
            description: Some(description.to_string()),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn upsert_permission(&self, name: &str, description: &str) -> AppResult<Permission> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        if let Some(permission) = tables.permissions.values_mut().find(|p| p.name == name) {
            permission.description = Some(description.to_string());
            permission.updated_at = now;
            return Ok(permission.clone());
        }
        let (resource, action) = Permission::split_name(name);
        let permission = Permission {
            id: PermissionId::new(tables.next_id()),
            name: name.to_string(),
            description: Some(description.to_string()),
            resource: resource.to_string(),
            action: action.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.permissions.insert(permission.id, permission.clone());
        Ok(permission)
    }

    async fn attach_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.roles.contains_key(&role_id) || !tables.permissions.contains_key(&permission_id)
        {
            return Err(AppError::not_found("Role or permission not found"));
        }
        tables.role_permissions.insert((role_id, permission_id));
        Ok(())
    }

    async fn find_role(&self, id: RoleId) -> AppResult<Option<Role>> {
        Ok(self.tables.read().await.roles.get(&id).cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let tables = self.tables.read().await;
        Ok(tables.roles.values().find(|r| r.name == name).cloned())
    }

    async fn find_permission(&self, id: PermissionId) -> AppResult<Option<Permission>> {
        Ok(self.tables.read().await.permissions.get(&id).cloned())
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let tables = self.tables.read().await;
        let mut roles: Vec<Role> = tables.roles.values().filter(|r| r.is_active).cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        let tables = self.tables.read().await;
        let mut permissions: Vec<Permission> = tables.permissions.values().cloned().collect();
        permissions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(permissions)
    }

    async fn granted_roles(&self, spec: &GrantSpec) -> AppResult<Vec<Role>> {
        if spec.path == GrantPath::Direct {
            return Ok(Vec::new());
        }
        let tables = self.tables.read().await;
        let mut roles: Vec<Role> = tables.effective_roles(spec).into_iter().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn granted_permissions(&self, spec: &GrantSpec) -> AppResult<Vec<Permission>> {
        let tables = self.tables.read().await;
        // Keyed by name so the result is distinct and ordered like the SQL.
        let mut found: BTreeMap<&str, &Permission> = BTreeMap::new();

        match spec.path {
            GrantPath::Direct => {
                for grant in tables.user_permissions.values() {
                    if grant.user_id != spec.user_id || !grant.is_effective(spec.as_of) {
                        continue;
                    }
                    if let Some(p) = tables.permissions.get(&grant.permission_id) {
                        found.insert(p.name.as_str(), p);
                    }
                }
            }
            GrantPath::ViaRoles => {
                for role in tables.effective_roles(spec) {
                    for (_, permission_id) in tables
                        .role_permissions
                        .range(
                            (role.id, PermissionId::new(i64::MIN))
                                ..=(role.id, PermissionId::new(i64::MAX)),
                        )
                    {
                        if let Some(p) = tables.permissions.get(permission_id) {
                            found.insert(p.name.as_str(), p);
                        }
                    }
                }
            }
        }

        Ok(found.into_values().cloned().collect())
    }

    async fn assign_role(&self, grant: &NewGrant<RoleId>) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&grant.user_id) || !tables.roles.contains_key(&grant.target) {
            return Err(AppError::not_found("User or role not found"));
        }
        tables.user_roles.insert(
            (grant.user_id, grant.target),
            UserRole {
                user_id: grant.user_id,
                role_id: grant.target,
                assigned_by: grant.granted_by,
                assigned_at: Utc::now(),
                expires_at: grant.expires_at,
                is_active: true,
            },
        );
        Ok(())
    }

    async fn remove_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.user_roles.get_mut(&(user_id, role_id)) {
            Some(grant) if grant.is_active => {
                grant.is_active = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn grant_permission(&self, grant: &NewGrant<PermissionId>) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&grant.user_id)
            || !tables.permissions.contains_key(&grant.target)
        {
            return Err(AppError::not_found("User or permission not found"));
        }
        tables.user_permissions.insert(
            (grant.user_id, grant.target),
            UserPermission {
                user_id: grant.user_id,
                permission_id: grant.target,
                granted_by: grant.granted_by,
                granted_at: Utc::now(),
                expires_at: grant.expires_at,
                is_active: true,
            },
        );
        Ok(())
    }

    async fn revoke_permission(
        &self,
        user_id: UserId,
        permission_id: PermissionId,
    ) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.user_permissions.get_mut(&(user_id, permission_id)) {
            Some(grant) if grant.is_active => {
                grant.is_active = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use shopkit_entity::user::{CreateUser, UserStatus};

    use super::*;
    use crate::store::UserStore;

    async fn user(store: &MemoryStore, email: &str) -> UserId {
        store
            .create(&CreateUser {
                first_name: "Test".to_string(),
                middle_name: None,
                last_name: "User".to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
                phone: None,
                status: UserStatus::Active,
            })
            .await
            .unwrap()
            .id
    }

    fn names(permissions: &[Permission]) -> Vec<&str> {
        permissions.iter().map(|p| p.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_expired_direct_grant_is_excluded() {
        let store = MemoryStore::new();
        let u = user(&store, "u@example.com").await;
        let customer = store.upsert_role("customer", "").await.unwrap();
        let create = store.upsert_permission("order:create", "").await.unwrap();
        let read_all = store.upsert_permission("order:read_all", "").await.unwrap();
        store.attach_permission(customer.id, create.id).await.unwrap();

        store
            .assign_role(&NewGrant {
                user_id: u,
                target: customer.id,
                granted_by: None,
                expires_at: None,
            })
            .await
            .unwrap();
        store
            .grant_permission(&NewGrant {
                user_id: u,
                target: read_all.id,
                granted_by: None,
                expires_at: Some(Utc::now() - Duration::minutes(1)),
            })
            .await
            .unwrap();

        let direct = store.granted_permissions(&GrantSpec::direct(u)).await.unwrap();
        let via_roles = store.granted_permissions(&GrantSpec::via_roles(u)).await.unwrap();
        assert!(direct.is_empty());
        assert_eq!(names(&via_roles), vec!["order:create"]);
    }

    #[tokio::test]
    async fn test_inactive_role_grants_nothing() {
        let store = MemoryStore::new();
        let u = user(&store, "u@example.com").await;
        let role = store.upsert_role("manager", "").await.unwrap();
        let permission = store.upsert_permission("product:create", "").await.unwrap();
        store.attach_permission(role.id, permission.id).await.unwrap();
        store
            .assign_role(&NewGrant {
                user_id: u,
                target: role.id,
                granted_by: None,
                expires_at: None,
            })
            .await
            .unwrap();

        store.tables.write().await.roles.get_mut(&role.id).unwrap().is_active = false;

        assert!(store.granted_roles(&GrantSpec::via_roles(u)).await.unwrap().is_empty());
        assert!(store.granted_permissions(&GrantSpec::via_roles(u)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_then_reassign_reactivates() {
        let store = MemoryStore::new();
        let u = user(&store, "u@example.com").await;
        let role = store.upsert_role("admin", "").await.unwrap();
        let grant = NewGrant { user_id: u, target: role.id, granted_by: Some(u), expires_at: None };

        store.assign_role(&grant).await.unwrap();
        assert!(store.remove_role(u, role.id).await.unwrap());
        assert!(!store.remove_role(u, role.id).await.unwrap());
        assert!(store.granted_roles(&GrantSpec::via_roles(u)).await.unwrap().is_empty());

        store.assign_role(&grant).await.unwrap();
        let roles = store.granted_roles(&GrantSpec::via_roles(u)).await.unwrap();
        assert_eq!(roles.len(), 1);
    }

    #[tokio::test]
    async fn test_assign_unknown_role_is_not_found() {
        let store = MemoryStore::new();
        let u = user(&store, "u@example.com").await;
        let err = store
            .assign_role(&NewGrant {
                user_id: u,
                target: RoleId::new(999),
                granted_by: None,
                expires_at: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, shopkit_core::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_permissions_are_deduplicated_across_roles() {
        let store = MemoryStore::new();
        let u = user(&store, "u@example.com").await;
        let shared = store.upsert_permission("product:read", "").await.unwrap();
        for name in ["customer", "manager"] {
            let role = store.upsert_role(name, "").await.unwrap();
            store.attach_permission(role.id, shared.id).await.unwrap();
            store
                .assign_role(&NewGrant {
                    user_id: u,
                    target: role.id,
                    granted_by: None,
                    expires_at: None,
                })
                .await
                .unwrap();
        }

        let via_roles = store.granted_permissions(&GrantSpec::via_roles(u)).await.unwrap();
        assert_eq!(names(&via_roles), vec!["product:read"]);
    }
}
