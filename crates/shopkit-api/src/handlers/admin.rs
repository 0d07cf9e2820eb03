//! User and grant administration. Every route here sits behind the
//! admin role gate plus a per-route permission gate.

use axum::Json;
use axum::extract::{Path, Query, State};

use shopkit_core::types::{PageResponse, UserId};
use shopkit_entity::rbac::{Permission, Role};
use shopkit_entity::user::User;
use shopkit_service::UserAccess;

use crate::dto::query::UserListQuery;
use crate::dto::request::{PermissionGrantRequest, RoleGrantRequest, UpdateStatusRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ListParams};
use crate::state::AppState;

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<User>>>> {
    let spec = params.into_spec(query.filters());
    let page = state.services.admin.list_users(&spec).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/v1/admin/users/{user_id}/roles
pub async fn user_roles(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> ApiResult<Json<ApiResponse<UserAccess>>> {
    let access = state.services.admin.user_access(user_id).await?;
    Ok(Json(ApiResponse::ok(access)))
}

/// PUT /api/v1/admin/users/{user_id}/status
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<UserId>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state
        .services
        .admin
        .update_status(Some(auth.principal()), user_id, req.status)
        .await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// POST /api/v1/admin/users/assign-role
pub async fn assign_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RoleGrantRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .services
        .admin
        .assign_role(&auth, req.user_id, req.role_id, req.expires_at)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("role assigned"))))
}

/// POST /api/v1/admin/users/remove-role
pub async fn remove_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RoleGrantRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .services
        .admin
        .remove_role(&auth, req.user_id, req.role_id)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("role removed"))))
}

/// POST /api/v1/admin/users/grant-permission
pub async fn grant_permission(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<PermissionGrantRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .services
        .admin
        .grant_permission(&auth, req.user_id, req.permission_id, req.expires_at)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "permission granted",
    ))))
}

/// POST /api/v1/admin/users/revoke-permission
pub async fn revoke_permission(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<PermissionGrantRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .services
        .admin
        .revoke_permission(&auth, req.user_id, req.permission_id)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "permission revoked",
    ))))
}

/// GET /api/v1/admin/roles
pub async fn list_roles(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<Role>>>> {
    let roles = state.services.admin.list_roles().await?;
    Ok(Json(ApiResponse::ok(roles)))
}

/// GET /api/v1/admin/permissions
pub async fn list_permissions(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<Permission>>>> {
    let permissions = state.services.admin.list_permissions().await?;
    Ok(Json(ApiResponse::ok(permissions)))
}
