//! Authorization gates.
//!
//! A gate checks the caller's cached permission snapshot against a
//! [`Requirement`] before the inner service runs. Every failure denies:
//! no principal is 401, an unmet requirement or an unreadable snapshot
//! is 403.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use shopkit_auth::rbac::{PermissionCache, Requirement, authorize};
use shopkit_core::error::AppError;
use shopkit_service::Principal;

use crate::error::ApiError;
use crate::state::AppState;

/// State of one gate layer.
#[derive(Debug, Clone)]
pub struct Gate {
    permissions: PermissionCache,
    requirement: Arc<Requirement>,
}

impl Gate {
    pub fn new(state: &AppState, requirement: Requirement) -> Self {
        Self {
            permissions: state.services.permissions.clone(),
            requirement: Arc::new(requirement),
        }
    }

    /// Gate passing callers holding any of `roles`.
    pub fn any_role(state: &AppState, roles: &[&str]) -> Self {
        Self::new(state, Requirement::any_role(roles))
    }

    /// Gate passing callers holding any of `permissions`.
    pub fn any_permission(state: &AppState, permissions: &[&str]) -> Self {
        Self::new(state, Requirement::any_permission(permissions))
    }
}

/// Rejects anonymous requests with 401.
pub async fn require_session(request: Request, next: Next) -> Result<Response, ApiError> {
    if request.extensions().get::<Principal>().is_none() {
        return Err(AppError::authentication("authentication required").into());
    }
    Ok(next.run(request).await)
}

/// Enforces the gate's requirement.
pub async fn enforce(
    State(gate): State<Gate>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(user_id) = request.extensions().get::<Principal>().map(|p| p.user_id) else {
        return Err(AppError::authentication("authentication required").into());
    };

    let snapshot = match gate.permissions.load(user_id).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(
                user_id = %user_id,
                requirement = %gate.requirement,
                error = %e,
                "Permission lookup failed, denying access"
            );
            return Err(AppError::authorization("access denied").into());
        }
    };

    if let Err(e) = authorize(&snapshot, &gate.requirement) {
        warn!(
            user_id = %user_id,
            path = %request.uri().path(),
            requirement = %gate.requirement,
            "Access denied"
        );
        return Err(e.into());
    }

    Ok(next.run(request).await)
}
