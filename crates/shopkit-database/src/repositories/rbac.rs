//! Role, permission and grant repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use shopkit_core::error::{AppError, ErrorKind};
use shopkit_core::result::AppResult;
use shopkit_core::types::{PermissionId, RoleId, UserId};
use shopkit_entity::rbac::{GrantPath, GrantSpec, NewGrant, Permission, Role};

use crate::store::RbacStore;

/// Permissions granted straight to the user.
const DIRECT_PERMISSIONS_SQL: &str = "\
    SELECT DISTINCT p.* FROM permissions p \
    JOIN user_permissions up ON up.permission_id = p.id \
    WHERE up.user_id = $1 AND up.is_active \
      AND (up.expires_at IS NULL OR up.expires_at > $2) \
    ORDER BY p.name";

/// Permissions reached through active, unexpired grants of active roles.
const ROLE_PERMISSIONS_SQL: &str = "\
    SELECT DISTINCT p.* FROM permissions p \
    JOIN role_permissions rp ON rp.permission_id = p.id \
    JOIN roles r ON r.id = rp.role_id AND r.is_active \
    JOIN user_roles ur ON ur.role_id = r.id \
    WHERE ur.user_id = $1 AND ur.is_active \
      AND (ur.expires_at IS NULL OR ur.expires_at > $2) \
    ORDER BY p.name";

const GRANTED_ROLES_SQL: &str = "\
    SELECT r.* FROM roles r \
    JOIN user_roles ur ON ur.role_id = r.id \
    WHERE ur.user_id = $1 AND r.is_active AND ur.is_active \
      AND (ur.expires_at IS NULL OR ur.expires_at > $2) \
    ORDER BY r.name";

/// Repository for the RBAC graph.
#[derive(Debug, Clone)]
pub struct RbacRepository {
    pool: PgPool,
}

impl RbacRepository {
    /// Create a new RBAC repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a failed grant insert, turning dangling references into not-found.
fn grant_error(e: sqlx::Error, what: &str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
            AppError::not_found(format!("User or {what} not found"))
        }
        _ => AppError::with_source(ErrorKind::Database, format!("Failed to grant {what}"), e),
    }
}

#[async_trait]
impl RbacStore for RbacRepository {
    async fn upsert_role(&self, name: &str, description: &str) -> AppResult<Role> {
        sqlx::query_as::<_, Role>(
            "INSERT INTO roles (name, description) VALUES ($1, $2) \
             ON CONFLICT (name) DO UPDATE \
             SET description = EXCLUDED.description, updated_at = NOW() \
             RETURNING *",
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert role", e))
    }

    async fn upsert_permission(&self, name: &str, description: &str) -> AppResult<Permission> {
        let (resource, action) = Permission::split_name(name);
        sqlx::query_as::<_, Permission>(
            "INSERT INTO permissions (name, description, resource, action) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (name) DO UPDATE \
             SET description = EXCLUDED.description, updated_at = NOW() \
             RETURNING *",
        )
        .bind(name)
        .bind(description)
        .bind(resource)
        .bind(action)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert permission", e))
    }

    async fn attach_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO role_permissions (role_id, permission_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(role_id)
        .bind(permission_id)
        .execute(&self.pool)
        .await
        .map_err(|e| grant_error(e, "permission"))?;
        Ok(())
    }

    async fn find_role(&self, id: RoleId) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find role", e))
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find role", e))
    }

    async fn find_permission(&self, id: PermissionId) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, Permission>("SELECT * FROM permissions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find permission", e))
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE is_active ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list roles", e))
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        sqlx::query_as::<_, Permission>("SELECT * FROM permissions ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list permissions", e)
            })
    }

    async fn granted_roles(&self, spec: &GrantSpec) -> AppResult<Vec<Role>> {
        if spec.path == GrantPath::Direct {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Role>(GRANTED_ROLES_SQL)
            .bind(spec.user_id)
            .bind(spec.as_of)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load user roles", e))
    }

    async fn granted_permissions(&self, spec: &GrantSpec) -> AppResult<Vec<Permission>> {
        let sql = match spec.path {
            GrantPath::Direct => DIRECT_PERMISSIONS_SQL,
            GrantPath::ViaRoles => ROLE_PERMISSIONS_SQL,
        };
        sqlx::query_as::<_, Permission>(sql)
            .bind(spec.user_id)
            .bind(spec.as_of)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load user permissions", e)
            })
    }

    async fn assign_role(&self, grant: &NewGrant<RoleId>) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id, assigned_by, expires_at, is_active) \
             VALUES ($1, $2, $3, $4, TRUE) \
             ON CONFLICT (user_id, role_id) DO UPDATE \
             SET assigned_by = EXCLUDED.assigned_by, assigned_at = NOW(), \
                 expires_at = EXCLUDED.expires_at, is_active = TRUE",
        )
        .bind(grant.user_id)
        .bind(grant.target)
        .bind(grant.granted_by)
        .bind(grant.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| grant_error(e, "role"))?;
        Ok(())
    }

    async fn remove_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE user_roles SET is_active = FALSE \
             WHERE user_id = $1 AND role_id = $2 AND is_active",
        )
        .bind(user_id)
        .bind(role_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to remove role", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn grant_permission(&self, grant: &NewGrant<PermissionId>) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO user_permissions \
             (user_id, permission_id, granted_by, expires_at, is_active) \
             VALUES ($1, $2, $3, $4, TRUE) \
             ON CONFLICT (user_id, permission_id) DO UPDATE \
             SET granted_by = EXCLUDED.granted_by, granted_at = NOW(), \
                 expires_at = EXCLUDED.expires_at, is_active = TRUE",
        )
        .bind(grant.user_id)
        .bind(grant.target)
        .bind(grant.granted_by)
        .bind(grant.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| grant_error(e, "permission"))?;
        Ok(())
    }

    async fn revoke_permission(
        &self,
        user_id: UserId,
        permission_id: PermissionId,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE user_permissions SET is_active = FALSE \
             WHERE user_id = $1 AND permission_id = $2 AND is_active",
        )
        .bind(user_id)
        .bind(permission_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke permission", e))?;

        Ok(result.rows_affected() > 0)
    }
}
