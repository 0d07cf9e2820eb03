//! The seam between services and whichever cache backend is configured.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// A string key/value store with per-entry expiry.
///
/// Structured values are stored as JSON text. Keys are passed unprefixed;
/// a backend that namespaces keys does so itself. An entry past its TTL is
/// never returned.
#[async_trait]
pub trait CacheProvider: Debug + Send + Sync + 'static {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Store `value`, replacing any previous entry, for `ttl` from now.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Remove `key`. Succeeds when it is already absent.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Remove every key matching a `*` glob such as `user_perms:*` and
    /// return how many went.
    async fn delete_pattern(&self, pattern: &str) -> AppResult<u64>;

    /// `Ok(true)` when the backend answers.
    async fn health_check(&self) -> AppResult<bool>;
}
