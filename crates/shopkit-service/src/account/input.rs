//! Registration input and its normalization.

use serde::{Deserialize, Serialize};

use shopkit_auth::password::PasswordValidator;
use shopkit_core::error::AppError;
use shopkit_core::result::AppResult;
use shopkit_entity::user::normalize_email;

/// Data supplied when an account is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

impl RegisterInput {
    /// Trim every field, lowercase the email and enforce the password policy.
    pub fn normalized(self, validator: &PasswordValidator) -> AppResult<Self> {
        let first_name = self.first_name.trim().to_string();
        let last_name = self.last_name.trim().to_string();
        let email = normalize_email(&self.email);

        if first_name.is_empty() {
            return Err(AppError::validation("first name is required"));
        }
        if last_name.is_empty() {
            return Err(AppError::validation("last name is required"));
        }
        if !email.contains('@') {
            return Err(AppError::validation("email is invalid"));
        }
        validator.validate(&self.password)?;

        Ok(Self {
            first_name,
            middle_name: trimmed_opt(self.middle_name),
            last_name,
            email,
            password: self.password,
            phone: trimmed_opt(self.phone),
        })
    }
}

/// Trim an optional field, treating blank as absent.
fn trimmed_opt(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use shopkit_core::ErrorKind;
    use shopkit_core::config::AuthConfig;

    use super::*;

    fn input() -> RegisterInput {
        RegisterInput {
            first_name: "  Ada ".to_string(),
            middle_name: Some("   ".to_string()),
            last_name: "Lovelace".to_string(),
            email: " Ada@Example.COM ".to_string(),
            password: "analytical-engine".to_string(),
            phone: None,
        }
    }

    fn validator() -> PasswordValidator {
        PasswordValidator::new(&AuthConfig::default())
    }

    #[test]
    fn test_normalizes_fields() {
        let normalized = input().normalized(&validator()).unwrap();
        assert_eq!(normalized.first_name, "Ada");
        assert_eq!(normalized.middle_name, None);
        assert_eq!(normalized.email, "ada@example.com");
    }

    #[test]
    fn test_rejects_missing_names_and_bad_email() {
        let mut no_name = input();
        no_name.last_name = " ".to_string();
        assert_eq!(
            no_name.normalized(&validator()).unwrap_err().kind,
            ErrorKind::Validation
        );

        let mut bad_email = input();
        bad_email.email = "ada.example.com".to_string();
        assert!(bad_email.normalized(&validator()).is_err());

        let mut short = input();
        short.password = "short".to_string();
        assert!(short.normalized(&validator()).is_err());
    }
}
