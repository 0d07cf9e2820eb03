//! The authenticated identity of a request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopkit_core::types::UserId;
use shopkit_entity::session::Session;

/// Who is acting, and through which session.
///
/// Inserted into request extensions by the session middleware and passed
/// into service methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    /// Hash of the session token.
    pub session_id: String,
    pub expires_at: DateTime<Utc>,
}

impl Principal {
    pub fn new(session: &Session) -> Self {
        Self {
            user_id: session.user_id,
            session_id: session.token_hash.clone(),
            expires_at: session.expires_at,
        }
    }
}
