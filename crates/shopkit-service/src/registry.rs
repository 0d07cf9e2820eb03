//! Construction of every service from stores, cache and configuration.

use std::sync::Arc;

use shopkit_auth::password::{PasswordHasher, PasswordValidator};
use shopkit_auth::rbac::{PermissionCache, PermissionResolver};
use shopkit_auth::session::SessionManager;
use shopkit_cache::CacheManager;
use shopkit_core::config::AppConfig;
use shopkit_core::traits::cache::CacheProvider;
use shopkit_database::Stores;

use crate::account::AccountService;
use crate::admin::AdminService;
use crate::catalog::CatalogService;
use crate::order::OrderService;

/// All services sharing one set of stores and one cache.
#[derive(Debug, Clone)]
pub struct ServiceRegistry {
    pub accounts: AccountService,
    pub admin: AdminService,
    pub catalog: CatalogService,
    pub orders: OrderService,
    pub permissions: PermissionCache,
    pub stores: Stores,
    pub cache: CacheManager,
}

impl ServiceRegistry {
    pub fn new(stores: Stores, cache: CacheManager, config: &AppConfig) -> Self {
        let cache_provider: Arc<dyn CacheProvider> = Arc::new(cache.clone());
        let sessions = SessionManager::new(stores.sessions.clone(), &config.session);
        let permissions = PermissionCache::new(
            cache_provider.clone(),
            PermissionResolver::new(stores.rbac.clone()),
            stores.users.clone(),
        );

        let accounts = AccountService::new(
            stores.users.clone(),
            stores.rbac.clone(),
            sessions.clone(),
            permissions.clone(),
            cache_provider,
            PasswordHasher::new(),
            PasswordValidator::new(&config.auth),
            config.auth.default_role.clone(),
        );
        let admin = AdminService::new(
            stores.users.clone(),
            stores.rbac.clone(),
            sessions,
            permissions.clone(),
        );

        Self {
            accounts,
            admin,
            catalog: CatalogService::new(stores.catalog.clone()),
            orders: OrderService::new(stores.orders.clone()),
            permissions,
            stores,
            cache,
        }
    }
}
