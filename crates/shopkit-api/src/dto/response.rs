//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopkit_entity::user::User;
use shopkit_service::AuthOutcome;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always `true`; failures use the error envelope.
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// A user together with a freshly issued session token.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<AuthOutcome> for SessionResponse {
    fn from(outcome: AuthOutcome) -> Self {
        let expires_at = outcome.session.expires_at();
        Self {
            user: outcome.user,
            token: outcome.session.token,
            expires_at,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of a forced logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForceLogoutResponse {
    pub sessions_destroyed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrfResponse {
    pub csrf_token: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Readiness check result, one entry per dependency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub database: String,
    pub cache: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionResponse {
    pub name: String,
    pub version: String,
}
