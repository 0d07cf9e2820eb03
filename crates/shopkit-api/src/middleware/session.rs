//! Session resolution.
//!
//! Runs on every request. A presented token that maps to a live session
//! puts a [`Principal`](shopkit_service::Principal) into the request
//! extensions; anything else leaves the request anonymous. Rejecting is
//! left to the gates and the `AuthUser` extractor.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::error::ApiError;
use crate::extractors::presented_token;
use crate::state::AppState;

pub async fn resolve_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(token) = presented_token(request.headers(), state.cookie_name()) {
        match state.services.accounts.authenticate(&token).await? {
            Some(principal) => {
                request.extensions_mut().insert(principal);
            }
            None => debug!("Presented session token is unknown or expired"),
        }
    }

    Ok(next.run(request).await)
}
