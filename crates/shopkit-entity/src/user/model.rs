//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopkit_core::types::UserId;
use sqlx::FromRow;

use super::status::UserStatus;

/// A registered customer or staff account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    /// Unique, stored lowercased.
    pub email: String,
    /// Argon2 password hash in PHC format.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    /// Account status.
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// When the email address was verified, if ever.
    pub verified_at: Option<DateTime<Utc>>,
}

impl User {
    /// Check if the user can log in right now.
    pub fn can_login(&self) -> bool {
        self.status.can_login()
    }

    /// First, middle and last name joined by spaces.
    pub fn full_name(&self) -> String {
        [
            Some(self.first_name.as_str()),
            self.middle_name.as_deref(),
            Some(self.last_name.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    /// Email address, already normalized.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    pub phone: Option<String>,
    pub status: UserStatus,
}

/// Normalize an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
