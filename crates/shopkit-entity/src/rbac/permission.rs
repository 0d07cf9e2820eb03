//! Permission entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopkit_core::types::PermissionId;
use sqlx::FromRow;

/// Permission name that satisfies every permission check.
pub const WILDCARD_PERMISSION: &str = "*:*";

/// A `resource:action` capability, e.g. `order:create`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Permission {
    pub id: PermissionId,
    /// Unique `resource:action` name.
    pub name: String,
    pub description: Option<String>,
    pub resource: String,
    pub action: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Permission {
    /// Split a permission name into `(resource, action)`.
    ///
    /// A name without a colon is treated as a resource with an empty action.
    pub fn split_name(name: &str) -> (&str, &str) {
        name.split_once(':').unwrap_or((name, ""))
    }

    /// Whether this is the wildcard permission.
    pub fn is_wildcard(&self) -> bool {
        self.name == WILDCARD_PERMISSION
    }
}
