//! Order placement and listing.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use shopkit_core::types::PageResponse;
use shopkit_entity::order::{Order, OrderWithItems};

use crate::dto::query::OrderListQuery;
use crate::dto::request::PlaceOrderRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ListParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/v1/orders
pub async fn list_own(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
    Query(query): Query<OrderListQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<Order>>>> {
    let spec = params.into_spec(query.filters());
    let page = state.services.orders.list_own(&auth, spec).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// POST /api/v1/orders
pub async fn place(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<PlaceOrderRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<OrderWithItems>>)> {
    let order = state.services.orders.place(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(order))))
}

/// GET /api/v1/orders/all
pub async fn list_all(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    Query(query): Query<OrderListQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<Order>>>> {
    let spec = params.into_spec(query.filters());
    let page = state.services.orders.list_all(&spec).await?;
    Ok(Json(ApiResponse::ok(page)))
}
