//! Data-access traits.
//!
//! These traits are the only polymorphic seam between services and
//! persistence. Each has a PostgreSQL implementation in
//! [`crate::repositories`] and an in-memory one in [`crate::memory`].

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use shopkit_core::result::AppResult;
use shopkit_core::types::{PageResponse, PermissionId, QuerySpec, RoleId, UserId};
use shopkit_entity::catalog::{CreateProduct, Product, ProductFilter};
use shopkit_entity::order::{NewOrder, Order, OrderFilter, OrderWithItems};
use shopkit_entity::rbac::{GrantSpec, NewGrant, Permission, Role};
use shopkit_entity::session::Session;
use shopkit_entity::user::{CreateUser, User, UserFilter, UserStatus};

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::repositories::{
    OrderRepository, ProductRepository, RbacRepository, SessionRepository, UserRepository,
};

/// Credential store.
#[async_trait]
pub trait UserStore: Send + Sync + Debug + 'static {
    /// Insert a user. A taken email yields a conflict and inserts nothing.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Case-insensitive lookup.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn list(&self, spec: &QuerySpec<UserFilter>) -> AppResult<PageResponse<User>>;

    /// Change the status and bump `updated_at`. Missing users yield not-found.
    async fn update_status(&self, id: UserId, status: UserStatus) -> AppResult<User>;

    /// Replace the password hash and bump `updated_at`. Missing users yield not-found.
    async fn update_password(&self, id: UserId, password_hash: &str) -> AppResult<()>;
}

/// Roles, permissions and user grants.
#[async_trait]
pub trait RbacStore: Send + Sync + Debug + 'static {
    /// Insert a role or refresh the description of an existing one.
    async fn upsert_role(&self, name: &str, description: &str) -> AppResult<Role>;

    /// Insert a permission or refresh the description of an existing one.
    async fn upsert_permission(&self, name: &str, description: &str) -> AppResult<Permission>;

    /// Link a permission to a role. Idempotent.
    async fn attach_permission(&self, role_id: RoleId, permission_id: PermissionId)
    -> AppResult<()>;

    async fn find_role(&self, id: RoleId) -> AppResult<Option<Role>>;

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    async fn find_permission(&self, id: PermissionId) -> AppResult<Option<Permission>>;

    /// Active roles ordered by name.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// All permissions ordered by name.
    async fn list_permissions(&self) -> AppResult<Vec<Permission>>;

    /// Roles reached by `spec`. Along [`GrantPath::Direct`](shopkit_entity::rbac::GrantPath)
    /// no role is reached.
    async fn granted_roles(&self, spec: &GrantSpec) -> AppResult<Vec<Role>>;

    /// Permissions reached by `spec`, each at most once.
    async fn granted_permissions(&self, spec: &GrantSpec) -> AppResult<Vec<Permission>>;

    /// Assign a role. Re-assigning refreshes and reactivates the existing grant.
    async fn assign_role(&self, grant: &NewGrant<RoleId>) -> AppResult<()>;

    /// Deactivate a role grant. Returns whether an active grant existed.
    async fn remove_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool>;

    /// Grant a permission directly. Re-granting refreshes and reactivates.
    async fn grant_permission(&self, grant: &NewGrant<PermissionId>) -> AppResult<()>;

    /// Deactivate a direct grant. Returns whether an active grant existed.
    async fn revoke_permission(&self, user_id: UserId, permission_id: PermissionId)
    -> AppResult<bool>;
}

/// Server-side session records keyed by token hash.
#[async_trait]
pub trait SessionStore: Send + Sync + Debug + 'static {
    async fn put(&self, session: &Session) -> AppResult<()>;

    /// Fetch a live session. Expired sessions are deleted and reported absent.
    async fn get(&self, token_hash: &str) -> AppResult<Option<Session>>;

    /// Atomically replace the session `old_hash` with `session`.
    ///
    /// Returns whether `old_hash` existed. The new session is stored either way.
    async fn renew(&self, old_hash: &str, session: &Session) -> AppResult<bool>;

    /// Returns whether a session was removed.
    async fn destroy(&self, token_hash: &str) -> AppResult<bool>;

    /// Remove every session of a user. Returns the number removed.
    async fn destroy_for_user(&self, user_id: UserId) -> AppResult<u64>;

    /// Delete every session past its expiry. Returns the number deleted.
    async fn purge_expired(&self) -> AppResult<u64>;
}

/// Product catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync + Debug + 'static {
    /// Insert a product. A taken slug yields a conflict.
    async fn create_product(&self, data: &CreateProduct) -> AppResult<Product>;

    async fn list_products(&self, spec: &QuerySpec<ProductFilter>)
    -> AppResult<PageResponse<Product>>;
}

/// Orders.
#[async_trait]
pub trait OrderStore: Send + Sync + Debug + 'static {
    /// Price the lines from the catalog, take the stock and insert the order.
    ///
    /// All or nothing: unknown products yield not-found and short stock a
    /// conflict, with no stock taken.
    async fn place_order(&self, order: &NewOrder) -> AppResult<OrderWithItems>;

    async fn list_orders(&self, spec: &QuerySpec<OrderFilter>) -> AppResult<PageResponse<Order>>;
}

/// Every store behind one handle, cloned into services.
#[derive(Debug, Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub rbac: Arc<dyn RbacStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub catalog: Arc<dyn CatalogStore>,
    pub orders: Arc<dyn OrderStore>,
    /// Present for the postgres backend, used by readiness checks.
    pool: Option<DatabasePool>,
}

impl Stores {
    /// PostgreSQL repositories sharing one pool.
    pub fn postgres(pool: DatabasePool) -> Self {
        let pg = pool.pool().clone();
        Self {
            users: Arc::new(UserRepository::new(pg.clone())),
            rbac: Arc::new(RbacRepository::new(pg.clone())),
            sessions: Arc::new(SessionRepository::new(pg.clone())),
            catalog: Arc::new(ProductRepository::new(pg.clone())),
            orders: Arc::new(OrderRepository::new(pg)),
            pool: Some(pool),
        }
    }

    /// All stores backed by one in-memory store.
    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            rbac: store.clone(),
            sessions: store.clone(),
            catalog: store.clone(),
            orders: store,
            pool: None,
        }
    }

    /// Check that the backing database answers.
    pub async fn ping(&self) -> AppResult<()> {
        match &self.pool {
            Some(pool) => pool.ping().await,
            None => Ok(()),
        }
    }
}
