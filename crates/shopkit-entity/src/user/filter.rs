//! Listing filters for users.

use serde::{Deserialize, Serialize};

use super::model::User;
use super::status::UserStatus;

/// One predicate of a user listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserFilter {
    /// Exact status match.
    Status(UserStatus),
    /// Case-insensitive substring of the email address.
    EmailContains(String),
}

impl UserFilter {
    /// Evaluate the predicate against a loaded user.
    pub fn matches(&self, user: &User) -> bool {
        match self {
            Self::Status(status) => user.status == *status,
            Self::EmailContains(term) => user.email.contains(&term.to_lowercase()),
        }
    }
}

/// Columns a user listing may be ordered by.
pub const USER_SORT_FIELDS: &[&str] = &["id", "email", "created_at", "last_name"];
