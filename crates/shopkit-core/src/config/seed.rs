//! Seed data configuration.

use serde::{Deserialize, Serialize};

/// Identity of the administrator created by `shopkit seed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
    #[serde(default = "default_admin_first_name")]
    pub admin_first_name: String,
    #[serde(default = "default_admin_last_name")]
    pub admin_last_name: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            admin_email: default_admin_email(),
            admin_first_name: default_admin_first_name(),
            admin_last_name: default_admin_last_name(),
        }
    }
}

fn default_admin_email() -> String {
    "admin@shopkit.local".to_string()
}

fn default_admin_first_name() -> String {
    "Shop".to_string()
}

fn default_admin_last_name() -> String {
    "Admin".to_string()
}
