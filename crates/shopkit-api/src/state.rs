//! Shared application state handed to every handler.

use std::sync::Arc;

use shopkit_core::config::AppConfig;
use shopkit_service::ServiceRegistry;

/// Cloned into each request. Everything inside is reference counted.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: ServiceRegistry,
}

impl AppState {
    pub fn new(config: AppConfig, services: ServiceRegistry) -> Self {
        Self {
            config: Arc::new(config),
            services,
        }
    }

    /// Name of the session cookie.
    pub fn cookie_name(&self) -> &str {
        &self.config.session.cookie_name
    }
}
