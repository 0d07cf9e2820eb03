//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopkit_core::types::UserId;
use sqlx::FromRow;

/// A server-side session bound to one user.
///
/// Only the SHA-256 hash of the bearer token is stored; the token itself
/// exists solely in the client's cookie or `Authorization` header.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Hex SHA-256 of the session token. Primary key.
    pub token_hash: String,
    /// The user this session belongs to.
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    /// Absolute expiry. Sessions are never extended.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Check whether the session has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Check whether the session has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Time left before expiry, zero once expired.
    pub fn remaining(&self) -> chrono::Duration {
        (self.expires_at - Utc::now()).max(chrono::Duration::zero())
    }
}
