//! Health check handlers.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use shopkit_core::error::AppError;
use shopkit_core::traits::cache::CacheProvider;

use crate::dto::response::{ApiResponse, HealthResponse, ReadinessResponse, VersionResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /version
pub async fn version() -> Json<ApiResponse<VersionResponse>> {
    Json(ApiResponse::ok(VersionResponse {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// GET /api/health
pub async fn health() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// GET /api/health/readiness
///
/// 503 when the database or the cache does not answer.
pub async fn readiness(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<ReadinessResponse>>> {
    if let Err(e) = state.services.stores.ping().await {
        warn!(error = %e, "Readiness: database unavailable");
        return Err(AppError::service_unavailable("database is unavailable").into());
    }
    match state.services.cache.health_check().await {
        Ok(true) => {}
        Ok(false) => {
            warn!(backend = state.services.cache.backend(), "Readiness: cache unhealthy");
            return Err(AppError::service_unavailable("cache is unavailable").into());
        }
        Err(e) => {
            warn!(
                backend = state.services.cache.backend(),
                error = %e,
                "Readiness: cache unavailable"
            );
            return Err(AppError::service_unavailable("cache is unavailable").into());
        }
    }

    Ok(Json(ApiResponse::ok(ReadinessResponse {
        status: "ready".to_string(),
        database: "up".to_string(),
        cache: "up".to_string(),
    })))
}
