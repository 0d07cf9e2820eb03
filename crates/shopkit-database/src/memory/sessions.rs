use async_trait::async_trait;
use chrono::Utc;

use shopkit_core::result::AppResult;
use shopkit_core::types::UserId;
use shopkit_entity::session::Session;

use super::MemoryStore;
use crate::store::SessionStore;

#[async_trait]
impl SessionStore for MemoryStore {
    async fn put(&self, session: &Session) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .sessions
            .insert(session.token_hash.clone(), session.clone());
        Ok(())
    }

    async fn get(&self, token_hash: &str) -> AppResult<Option<Session>> {
        let mut tables = self.tables.write().await;
        match tables.sessions.get(token_hash) {
            Some(session) if session.is_expired_at(Utc::now()) => {
                tables.sessions.remove(token_hash);
                Ok(None)
            }
            other => Ok(other.cloned()),
        }
    }

    async fn renew(&self, old_hash: &str, session: &Session) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let existed = tables.sessions.remove(old_hash).is_some();
        tables
            .sessions
            .insert(session.token_hash.clone(), session.clone());
        Ok(existed)
    }

    async fn destroy(&self, token_hash: &str) -> AppResult<bool> {
        Ok(self
            .tables
            .write()
            .await
            .sessions
            .remove(token_hash)
            .is_some())
    }

    async fn destroy_for_user(&self, user_id: UserId) -> AppResult<u64> {
        let now = Utc::now();
        let mut tables = self.tables.write().await;
        let mut live = 0;
        tables.sessions.retain(|_, session| {
            if session.user_id != user_id {
                return true;
            }
            if !session.is_expired_at(now) {
                live += 1;
            }
            false
        });
        Ok(live)
    }

    async fn purge_expired(&self) -> AppResult<u64> {
        let now = Utc::now();
        let mut tables = self.tables.write().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|_, session| !session.is_expired_at(now));
        Ok((before - tables.sessions.len()) as u64)
    }
}
