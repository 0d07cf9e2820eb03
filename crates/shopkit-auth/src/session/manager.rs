//! Session lifecycle manager: issue, rotate, resolve and destroy.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use shopkit_core::config::SessionConfig;
use shopkit_core::result::AppResult;
use shopkit_core::types::UserId;
use shopkit_database::store::SessionStore;
use shopkit_entity::session::Session;

use super::token::{generate_token, hash_token};

/// A freshly issued session. `token` is the only copy of the raw token.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub session: Session,
}

impl IssuedSession {
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.session.expires_at
    }
}

/// Manages the session lifecycle on top of a [`SessionStore`].
#[derive(Clone)]
pub struct SessionManager {
    /// Session persistence.
    store: Arc<dyn SessionStore>,
    /// Fixed lifetime of every session.
    lifetime: Duration,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, config: &SessionConfig) -> Self {
        Self {
            store,
            lifetime: config.lifetime(),
        }
    }

    /// Issue a session for `user_id`.
    ///
    /// When the request carried a token it is destroyed in the same step,
    /// so a token planted before login never becomes authenticated.
    pub async fn issue(&self, user_id: UserId, previous: Option<&str>) -> AppResult<IssuedSession> {
        let token = generate_token();
        let now = Utc::now();
        let session = Session {
            token_hash: hash_token(&token),
            user_id,
            created_at: now,
            expires_at: now + self.lifetime,
        };

        match previous {
            Some(old) => {
                let replaced = self.store.renew(&hash_token(old), &session).await?;
                debug!(user_id = %user_id, replaced, "Rotated session token");
            }
            None => self.store.put(&session).await?,
        }

        info!(user_id = %user_id, expires_at = %session.expires_at, "Session issued");
        Ok(IssuedSession { token, session })
    }

    /// Look up the live session behind a raw token.
    pub async fn resolve(&self, token: &str) -> AppResult<Option<Session>> {
        self.store.get(&hash_token(token)).await
    }

    /// Destroy one session by its stored hash. Returns whether it existed.
    pub async fn destroy(&self, token_hash: &str) -> AppResult<bool> {
        self.store.destroy(token_hash).await
    }

    /// Destroy every session of a user. Returns how many were live.
    pub async fn destroy_all_for_user(&self, user_id: UserId) -> AppResult<u64> {
        let count = self.store.destroy_for_user(user_id).await?;
        info!(user_id = %user_id, count, "Destroyed all sessions of user");
        Ok(count)
    }
}
