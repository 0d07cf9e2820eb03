//! Session configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Session lifetime and cookie settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Fixed lifetime of a session in minutes. Sessions are never extended.
    #[serde(default = "default_lifetime")]
    pub lifetime_minutes: i64,
    /// Name of the cookie carrying the session token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Mark the cookie `Secure` (HTTPS only).
    #[serde(default)]
    pub cookie_secure: bool,
    /// How often the server deletes expired sessions.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lifetime_minutes: default_lifetime(),
            cookie_name: default_cookie_name(),
            cookie_secure: false,
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

impl SessionConfig {
    /// The configured lifetime as a duration.
    pub fn lifetime(&self) -> Duration {
        Duration::minutes(self.lifetime_minutes)
    }

    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_seconds)
    }
}

fn default_lifetime() -> i64 {
    1440
}

fn default_cookie_name() -> String {
    "shopkit_session".to_string()
}

fn default_sweep_interval() -> u64 {
    5 * 60
}
