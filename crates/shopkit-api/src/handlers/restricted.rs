//! Endpoints for any signed-in user.

use axum::Json;
use axum::extract::{Path, State};

use shopkit_core::types::UserId;
use shopkit_service::MeView;

use crate::dto::request::ChangePasswordRequest;
use crate::dto::response::{ApiResponse, CsrfResponse, ForceLogoutResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/v1/restricted/
pub async fn index(auth: AuthUser) -> Json<ApiResponse<MessageResponse>> {
    Json(ApiResponse::ok(MessageResponse::new(format!(
        "authenticated as user {}",
        auth.user_id
    ))))
}

/// GET /api/v1/restricted/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<MeView>>> {
    let view = state.services.accounts.me(&auth).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// POST /api/v1/restricted/change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .services
        .accounts
        .change_password(&auth, &req.current_password, &req.new_password)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("password changed"))))
}

/// GET /api/v1/restricted/csrf
pub async fn csrf(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<CsrfResponse>>> {
    let csrf_token = state.services.accounts.csrf_token(&auth).await?;
    Ok(Json(ApiResponse::ok(CsrfResponse { csrf_token })))
}

/// POST /api/v1/restricted/logout/{user_id}
pub async fn force_logout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<UserId>,
) -> ApiResult<Json<ApiResponse<ForceLogoutResponse>>> {
    let sessions_destroyed = state
        .services
        .accounts
        .force_logout(&auth, user_id)
        .await?;
    Ok(Json(ApiResponse::ok(ForceLogoutResponse {
        sessions_destroyed,
    })))
}
