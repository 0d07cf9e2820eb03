//! The cache handle shared by every service.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use shopkit_core::config::{CacheBackend, CacheConfig};
use shopkit_core::error::AppError;
use shopkit_core::result::AppResult;
use shopkit_core::traits::cache::CacheProvider;

/// Cheaply cloneable handle over the configured backend.
#[derive(Debug, Clone)]
pub struct CacheManager {
    backend: &'static str,
    inner: Arc<dyn CacheProvider>,
}

impl CacheManager {
    /// Connect the backend selected by `config.provider`.
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        let manager = match config.provider {
            #[cfg(feature = "redis-backend")]
            CacheBackend::Redis => Self {
                backend: "redis",
                inner: Arc::new(crate::redis::RedisCache::connect(&config.redis).await?),
            },
            #[cfg(feature = "memory")]
            CacheBackend::Memory => Self {
                backend: "memory",
                inner: Arc::new(crate::memory::MemoryCacheProvider::new(&config.memory)),
            },
            #[allow(unreachable_patterns)]
            other => {
                return Err(AppError::configuration(format!(
                    "cache provider '{other}' is not compiled into this build"
                )));
            }
        };

        info!(backend = manager.backend, "Cache ready");
        Ok(manager)
    }

    /// Wrap an already constructed provider.
    pub fn from_provider(provider: Arc<dyn CacheProvider>) -> Self {
        Self {
            backend: "custom",
            inner: provider,
        }
    }

    /// Name of the backend in use, for logs and readiness checks.
    pub fn backend(&self) -> &'static str {
        self.backend
    }
}

#[async_trait]
impl CacheProvider for CacheManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }

    async fn delete_pattern(&self, pattern: &str) -> AppResult<u64> {
        self.inner.delete_pattern(pattern).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
