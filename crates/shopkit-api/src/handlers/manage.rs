//! Catalog management for staff roles.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use shopkit_entity::catalog::Product;

use crate::dto::request::CreateProductRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

// GET /api/v1/manage/products shares `products::list`.

/// POST /api/v1/manage/products
pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let product = state.services.catalog.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(product))))
}
