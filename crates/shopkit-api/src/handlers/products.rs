//! Public catalog listing.

use axum::Json;
use axum::extract::{Query, State};

use shopkit_core::types::PageResponse;
use shopkit_entity::catalog::Product;

use crate::dto::query::ProductListQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::ListParams;
use crate::state::AppState;

/// GET /api/v1/products
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    Query(query): Query<ProductListQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<Product>>>> {
    let spec = params.into_spec(query.filters());
    let page = state.services.catalog.list(&spec).await?;
    Ok(Json(ApiResponse::ok(page)))
}
