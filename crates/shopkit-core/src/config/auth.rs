//! Credential policy configuration.

use serde::{Deserialize, Serialize};

/// Password policy and registration defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Minimum password length in characters.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Minimum zxcvbn strength score (0-4). `0` disables the strength check.
    #[serde(default)]
    pub password_min_score: u8,
    /// Role assigned to newly registered users, when it exists.
    #[serde(default = "default_role")]
    pub default_role: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password_min_length: default_password_min(),
            password_min_score: 0,
            default_role: default_role(),
        }
    }
}

fn default_password_min() -> usize {
    8
}

fn default_role() -> String {
    "customer".to_string()
}
