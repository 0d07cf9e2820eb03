//! Wire shape of a failed request.

use serde::{Deserialize, Serialize};

/// `{"error": "FORBIDDEN", "message": "...", "details": {...}}`.
///
/// `details` only appears on validation failures, keyed by field name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
