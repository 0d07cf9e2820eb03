//! In-memory implementation of every data-access trait.
//!
//! All tables live behind one Tokio `RwLock`, so each trait method is
//! atomic with respect to the others. Suitable for tests and single-node
//! demos only; nothing survives a restart.

mod commerce;
mod rbac;
mod sessions;
mod users;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tokio::sync::RwLock;

use shopkit_core::types::{OrderId, PermissionId, ProductId, RoleId, UserId};
use shopkit_entity::catalog::Product;
use shopkit_entity::order::{Order, OrderItem};
use shopkit_entity::rbac::{Permission, Role, UserPermission, UserRole};
use shopkit_entity::session::Session;
use shopkit_entity::user::User;

/// Process-local store with the same semantics as the PostgreSQL repositories.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    roles: BTreeMap<RoleId, Role>,
    permissions: BTreeMap<PermissionId, Permission>,
    role_permissions: BTreeSet<(RoleId, PermissionId)>,
    user_roles: BTreeMap<(UserId, RoleId), UserRole>,
    user_permissions: BTreeMap<(UserId, PermissionId), UserPermission>,
    sessions: HashMap<String, Session>,
    products: BTreeMap<ProductId, Product>,
    orders: BTreeMap<OrderId, Order>,
    order_items: Vec<OrderItem>,
    /// Shared sequence standing in for every `BIGSERIAL`.
    last_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}
