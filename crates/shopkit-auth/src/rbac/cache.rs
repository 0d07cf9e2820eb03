//! Cache-aside permission snapshots keyed by user.
//!
//! Entries live under `user_perms:{user_id}` for [`PERMISSION_CACHE_TTL`].
//! Any cache trouble on read counts as a miss, and a failed write only
//! costs the next request another resolution. Concurrent misses may both
//! resolve and write; the last write wins.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use shopkit_cache::keys;
use shopkit_core::error::AppError;
use shopkit_core::result::AppResult;
use shopkit_core::traits::cache::CacheProvider;
use shopkit_core::types::UserId;
use shopkit_database::store::UserStore;
use shopkit_entity::rbac::WILDCARD_PERMISSION;

use super::resolver::PermissionResolver;

/// How long a snapshot may be served from the cache.
pub const PERMISSION_CACHE_TTL: Duration = Duration::from_secs(600);

/// Resolved roles and permissions of one user at `cached_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSnapshot {
    pub user_id: UserId,
    pub email: String,
    pub roles: BTreeSet<String>,
    pub permissions: BTreeSet<String>,
    pub cached_at: DateTime<Utc>,
}

impl PermissionSnapshot {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Whether the permission is held, directly or through `*:*`.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(WILDCARD_PERMISSION) || self.permissions.contains(permission)
    }

    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles.iter().any(|r| self.has_role(r.as_ref()))
    }

    pub fn has_any_permission<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        permissions.iter().any(|p| self.has_permission(p.as_ref()))
    }
}

/// Permission cache in front of the [`PermissionResolver`].
#[derive(Clone)]
pub struct PermissionCache {
    cache: Arc<dyn CacheProvider>,
    resolver: PermissionResolver,
    users: Arc<dyn UserStore>,
}

impl std::fmt::Debug for PermissionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionCache")
            .field("ttl", &PERMISSION_CACHE_TTL)
            .finish_non_exhaustive()
    }
}

impl PermissionCache {
    pub fn new(
        cache: Arc<dyn CacheProvider>,
        resolver: PermissionResolver,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            cache,
            resolver,
            users,
        }
    }

    /// Return the cached snapshot of `user_id`, resolving it on a miss.
    pub async fn load(&self, user_id: UserId) -> AppResult<PermissionSnapshot> {
        let key = keys::user_permissions(user_id);

        match self.cache.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<PermissionSnapshot>(&raw) {
                Ok(snapshot) => {
                    debug!(user_id = %user_id, "Permission cache hit");
                    return Ok(snapshot);
                }
                Err(e) => {
                    warn!(
                        user_id = %user_id,
                        error = %e,
                        "Discarding unreadable permission snapshot"
                    );
                }
            },
            Ok(None) => debug!(user_id = %user_id, "Permission cache miss"),
            Err(e) => warn!(user_id = %user_id, error = %e, "Permission cache read failed"),
        }

        let snapshot = self.build(user_id).await?;

        match serde_json::to_string(&snapshot) {
            Ok(raw) => {
                if let Err(e) = self.cache.set(&key, &raw, PERMISSION_CACHE_TTL).await {
                    warn!(user_id = %user_id, error = %e, "Permission cache write failed");
                }
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to encode permission snapshot");
            }
        }

        Ok(snapshot)
    }

    /// Resolve a fresh snapshot without touching the cache.
    pub async fn build(&self, user_id: UserId) -> AppResult<PermissionSnapshot> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("user {user_id} not found")))?;
        let grants = self.resolver.resolve(user_id).await?;

        Ok(PermissionSnapshot {
            user_id,
            email: user.email,
            roles: grants.roles,
            permissions: grants.permissions,
            cached_at: Utc::now(),
        })
    }

    /// Drop the cached snapshot of `user_id`.
    ///
    /// The triggering mutation has already happened, so a cache failure is
    /// logged rather than reported.
    pub async fn invalidate(&self, user_id: UserId) {
        match self.cache.delete(&keys::user_permissions(user_id)).await {
            Ok(()) => debug!(user_id = %user_id, "Permission cache invalidated"),
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Permission cache invalidation failed");
            }
        }
    }

    /// Drop every cached snapshot, e.g. after role definitions change.
    pub async fn invalidate_all(&self) -> AppResult<u64> {
        self.cache.delete_pattern(&keys::user_permissions_pattern()).await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use shopkit_cache::memory::MemoryCacheProvider;
    use shopkit_core::config::MemoryCacheConfig;
    use shopkit_database::MemoryStore;
    use shopkit_database::store::RbacStore;
    use shopkit_entity::rbac::NewGrant;

    use super::*;
    use crate::rbac::test_support::store_with_user;

    /// A cache backend that is always down.
    #[derive(Debug)]
    struct BrokenCache;

    #[async_trait]
    impl CacheProvider for BrokenCache {
        async fn get(&self, _key: &str) -> AppResult<Option<String>> {
            Err(AppError::cache("connection refused"))
        }
        async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> AppResult<()> {
            Err(AppError::cache("connection refused"))
        }
        async fn delete(&self, _key: &str) -> AppResult<()> {
            Err(AppError::cache("connection refused"))
        }
        async fn delete_pattern(&self, _pattern: &str) -> AppResult<u64> {
            Err(AppError::cache("connection refused"))
        }
        async fn health_check(&self) -> AppResult<bool> {
            Ok(false)
        }
    }

    fn memory_cache() -> Arc<MemoryCacheProvider> {
        Arc::new(MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 100 }))
    }

    fn permission_cache(
        store: &Arc<MemoryStore>,
        cache: Arc<dyn CacheProvider>,
    ) -> PermissionCache {
        PermissionCache::new(cache, PermissionResolver::new(store.clone()), store.clone())
    }

    async fn assign(store: &MemoryStore, user_id: UserId, role: &str) {
        let role = store.find_role_by_name(role).await.unwrap().unwrap();
        store
            .assign_role(&NewGrant {
                user_id,
                target: role.id,
                granted_by: None,
                expires_at: None,
            })
            .await
            .unwrap();
    }

    #[test]
    fn test_wildcard_satisfies_every_permission() {
        let snapshot = PermissionSnapshot {
            user_id: UserId::new(1),
            email: "root@example.com".to_string(),
            roles: BTreeSet::from(["super_admin".to_string()]),
            permissions: BTreeSet::from([WILDCARD_PERMISSION.to_string()]),
            cached_at: Utc::now(),
        };
        assert!(snapshot.has_permission("order:read_all"));
        assert!(snapshot.has_any_permission(&["anything:at_all"]));
        assert!(!snapshot.has_role("admin"));
        assert!(!snapshot.has_any_permission::<&str>(&[]));
    }

    #[tokio::test]
    async fn test_miss_populates_and_hit_serves_stale_until_invalidated() {
        let (store, user_id) = store_with_user().await;
        let cache = memory_cache();
        let permissions = permission_cache(&store, cache.clone());

        let first = permissions.load(user_id).await.unwrap();
        assert!(first.permissions.is_empty());
        assert!(cache.get(&keys::user_permissions(user_id)).await.unwrap().is_some());

        assign(&store, user_id, "customer").await;

        // Still served from the cache.
        let cached = permissions.load(user_id).await.unwrap();
        assert_eq!(cached, first);

        permissions.invalidate(user_id).await;
        let fresh = permissions.load(user_id).await.unwrap();
        assert!(fresh.has_role("customer"));
        assert!(fresh.has_permission("order:create"));
    }

    #[tokio::test]
    async fn test_unreadable_entry_counts_as_miss() {
        let (store, user_id) = store_with_user().await;
        let cache = memory_cache();
        cache
            .set(&keys::user_permissions(user_id), "{not json", PERMISSION_CACHE_TTL)
            .await
            .unwrap();

        let snapshot = permission_cache(&store, cache.clone())
            .load(user_id)
            .await
            .unwrap();
        assert_eq!(snapshot.email, "grace@example.com");

        let raw = cache
            .get(&keys::user_permissions(user_id))
            .await
            .unwrap()
            .unwrap();
        assert!(serde_json::from_str::<PermissionSnapshot>(&raw).is_ok());
    }

    #[tokio::test]
    async fn test_broken_cache_still_resolves() {
        let (store, user_id) = store_with_user().await;
        assign(&store, user_id, "manager").await;

        let permissions = permission_cache(&store, Arc::new(BrokenCache));
        let snapshot = permissions.load(user_id).await.unwrap();
        assert!(snapshot.has_permission("product:create"));

        // Must not panic or error.
        permissions.invalidate(user_id).await;
        assert!(permissions.invalidate_all().await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let (store, _) = store_with_user().await;
        let err = permission_cache(&store, memory_cache())
            .load(UserId::new(999))
            .await
            .unwrap_err();
        assert_eq!(err.kind, shopkit_core::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_invalidate_all_clears_every_user() {
        let (store, user_id) = store_with_user().await;
        let cache = memory_cache();
        let permissions = permission_cache(&store, cache.clone());
        permissions.load(user_id).await.unwrap();
        cache
            .set("csrf:abc", "token", PERMISSION_CACHE_TTL)
            .await
            .unwrap();

        assert_eq!(permissions.invalidate_all().await.unwrap(), 1);
        assert!(cache.get("csrf:abc").await.unwrap().is_some());
    }
}
