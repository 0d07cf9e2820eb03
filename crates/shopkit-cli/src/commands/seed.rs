//! Reference data and bootstrap admin.

use shopkit_core::config::SeedConfig;
use shopkit_core::result::AppResult;
use shopkit_database::reference::seed_reference_data;
use shopkit_service::ServiceRegistry;

use crate::output;

/// Execute the seed command
pub async fn execute(config_path: Option<&str>) -> AppResult<()> {
    let config = super::load_config(config_path)?;
    let services = super::open_services(&config).await?;
    seed_with(&services, &config.seed).await
}

/// Seed through already-built services.
pub async fn seed_with(services: &ServiceRegistry, seed: &SeedConfig) -> AppResult<()> {
    let summary = seed_reference_data(services.stores.rbac.as_ref()).await?;
    output::print_success(&format!(
        "Reference data: {} roles, {} permissions, {} role links",
        summary.roles, summary.permissions, summary.links
    ));

    // Role links may have changed under users that already have a snapshot.
    match services.permissions.invalidate_all().await {
        Ok(0) => {}
        Ok(count) => output::print_kv("Permission snapshots dropped", &count.to_string()),
        Err(e) => output::print_warning(&format!("Could not clear permission cache: {e}")),
    }

    match services.accounts.bootstrap_admin(seed).await? {
        Some((admin, password)) => {
            output::print_success("Admin account created");
            output::print_kv("Email", &admin.email);
            output::print_kv("Password", &password);
            output::print_warning("The password is shown only once. Store it now.");
        }
        None => output::print_warning(&format!(
            "Admin account {} already exists, left untouched",
            seed.admin_email
        )),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use shopkit_cache::memory::MemoryCacheProvider;
    use shopkit_cache::{CacheManager, keys};
    use shopkit_core::config::{AppConfig, MemoryCacheConfig};
    use shopkit_core::traits::cache::CacheProvider;
    use shopkit_core::types::UserId;
    use shopkit_database::{MemoryStore, Stores};

    use super::*;

    fn registry() -> (ServiceRegistry, AppConfig) {
        let cache = CacheManager::from_provider(Arc::new(MemoryCacheProvider::new(
            &MemoryCacheConfig { max_capacity: 100 },
        )));
        let config = AppConfig::from_toml_str("[database]\nbackend = \"memory\"\n").unwrap();
        let services =
            ServiceRegistry::new(Stores::memory(Arc::new(MemoryStore::new())), cache, &config);
        (services, config)
    }

    #[tokio::test]
    async fn test_reseeding_drops_cached_permission_snapshots() {
        let (services, config) = registry();
        seed_with(&services, &config.seed).await.unwrap();

        let key = keys::user_permissions(UserId::new(7));
        services
            .cache
            .set(&key, "{}", Duration::from_secs(60))
            .await
            .unwrap();

        seed_with(&services, &config.seed).await.unwrap();
        assert!(services.cache.get(&key).await.unwrap().is_none());
    }
}
