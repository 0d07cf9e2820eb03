//! Role entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopkit_core::types::RoleId;
use sqlx::FromRow;

/// A named bundle of permissions.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: RoleId,
    /// Unique name such as `customer` or `admin`.
    pub name: String,
    pub description: Option<String>,
    /// Inactive roles grant nothing.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
