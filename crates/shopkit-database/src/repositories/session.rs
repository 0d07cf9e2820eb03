//! Session repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use shopkit_core::error::{AppError, ErrorKind};
use shopkit_core::result::AppResult;
use shopkit_core::types::UserId;
use shopkit_entity::session::Session;

use crate::store::SessionStore;

/// Repository for the `sessions` table.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn put(&self, session: &Session) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO sessions (token_hash, user_id, created_at, expires_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (token_hash) DO UPDATE \
             SET user_id = EXCLUDED.user_id, expires_at = EXCLUDED.expires_at",
        )
        .bind(&session.token_hash)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to store session", e))?;
        Ok(())
    }

    async fn get(&self, token_hash: &str) -> AppResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))?;

        match session {
            Some(session) if session.is_expired_at(Utc::now()) => {
                self.destroy(token_hash).await?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    async fn renew(&self, old_hash: &str, session: &Session) -> AppResult<bool> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let removed = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(old_hash)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rotate session", e))?
            .rows_affected();

        sqlx::query(
            "INSERT INTO sessions (token_hash, user_id, created_at, expires_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&session.token_hash)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rotate session", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit session rotation", e)
        })?;

        Ok(removed > 0)
    }

    async fn destroy(&self, token_hash: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete session", e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn destroy_for_user(&self, user_id: UserId) -> AppResult<u64> {
        // Expired rows are swept too but only live sessions are counted.
        let live: i64 = sqlx::query_scalar(
            "WITH removed AS (DELETE FROM sessions WHERE user_id = $1 RETURNING expires_at) \
             SELECT COUNT(*) FROM removed WHERE expires_at > NOW()",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete user sessions", e)
        })?;

        Ok(live as u64)
    }

    async fn purge_expired(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge expired sessions", e)
            })?;

        Ok(result.rows_affected())
    }
}
