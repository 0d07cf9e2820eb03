//! Route definitions for the shopkit HTTP API.
//!
//! Versioned endpoints are mounted under `/api/v1`. Access control is
//! layered per route group: a session check or role gate on the group,
//! then permission gates on individual routes.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use shopkit_core::error::AppError;

use crate::error::ApiError;
use crate::handlers;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::gate::{self, Gate, require_session};
use crate::middleware::logging::request_logging;
use crate::middleware::session::resolve_session;
use crate::state::AppState;

/// Roles admitted to `/api/v1/admin`.
pub const ADMIN_ROLES: &[&str] = &["admin", "super_admin"];
/// Roles admitted to `/api/v1/manage`.
pub const STAFF_ROLES: &[&str] = &["admin", "super_admin", "manager"];

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();
    let server = &config.server;

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(restricted_routes(&state))
        .merge(admin_routes(&state))
        .merge(manage_routes(&state))
        .merge(product_routes())
        .merge(order_routes(&state));

    let mut router = Router::new()
        .nest("/api/v1", api_routes)
        .merge(health_routes());
    if server.enable_docs {
        router = router.merge(docs_routes());
    }

    router
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), resolve_session))
        .layer(DefaultBodyLimit::max(server.max_body_bytes))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(server.request_timeout_seconds),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&server.cors))
        .layer(from_fn(request_logging))
        .with_state(state)
}

async fn not_found() -> ApiError {
    AppError::not_found("route not found").into()
}

/// Liveness, readiness and version.
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/version", get(handlers::health::version))
        .route("/api/health", get(handlers::health::health))
        .route("/api/health/readiness", get(handlers::health::readiness))
}

/// Register, login, logout. Open to anyone.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
}

/// Signed-in users.
fn restricted_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/restricted/", get(handlers::restricted::index))
        .route("/restricted/me", get(handlers::restricted::me))
        .route(
            "/restricted/change-password",
            post(handlers::restricted::change_password),
        )
        .route("/restricted/csrf", get(handlers::restricted::csrf))
        .route(
            "/restricted/logout/{user_id}",
            post(handlers::restricted::force_logout).route_layer(from_fn_with_state(
                Gate::any_permission(state, &["admin:users"]),
                gate::enforce,
            )),
        )
        .route_layer(from_fn(require_session))
}

/// User and grant administration.
fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/admin/users",
            get(handlers::admin::list_users).route_layer(from_fn_with_state(
                Gate::any_permission(state, &["user:read_all"]),
                gate::enforce,
            )),
        )
        .route(
            "/admin/users/{user_id}/roles",
            get(handlers::admin::user_roles).route_layer(from_fn_with_state(
                Gate::any_permission(state, &["user:read"]),
                gate::enforce,
            )),
        )
        .route(
            "/admin/users/{user_id}/status",
            put(handlers::admin::update_status).route_layer(from_fn_with_state(
                Gate::any_permission(state, &["user:write"]),
                gate::enforce,
            )),
        )
        .route(
            "/admin/users/assign-role",
            post(handlers::admin::assign_role).route_layer(from_fn_with_state(
                Gate::any_permission(state, &["role:assign"]),
                gate::enforce,
            )),
        )
        .route(
            "/admin/users/remove-role",
            post(handlers::admin::remove_role).route_layer(from_fn_with_state(
                Gate::any_permission(state, &["role:assign"]),
                gate::enforce,
            )),
        )
        .route(
            "/admin/users/grant-permission",
            post(handlers::admin::grant_permission).route_layer(from_fn_with_state(
                Gate::any_permission(state, &["permission:assign"]),
                gate::enforce,
            )),
        )
        .route(
            "/admin/users/revoke-permission",
            post(handlers::admin::revoke_permission).route_layer(from_fn_with_state(
                Gate::any_permission(state, &["permission:assign"]),
                gate::enforce,
            )),
        )
        .route("/admin/roles", get(handlers::admin::list_roles))
        .route("/admin/permissions", get(handlers::admin::list_permissions))
        .route_layer(from_fn_with_state(
            Gate::any_role(state, ADMIN_ROLES),
            gate::enforce,
        ))
}

/// Catalog management.
fn manage_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/manage/products",
            get(handlers::products::list).merge(post(handlers::manage::create_product).route_layer(
                from_fn_with_state(
                    Gate::any_permission(state, &["product:create"]),
                    gate::enforce,
                ),
            )),
        )
        .route_layer(from_fn_with_state(
            Gate::any_role(state, STAFF_ROLES),
            gate::enforce,
        ))
}

/// Public catalog.
fn product_routes() -> Router<AppState> {
    Router::new().route("/products", get(handlers::products::list))
}

/// Orders of the caller, and of everyone for those allowed.
fn order_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/orders",
            get(handlers::orders::list_own).merge(post(handlers::orders::place).route_layer(
                from_fn_with_state(
                    Gate::any_permission(state, &["order:create"]),
                    gate::enforce,
                ),
            )),
        )
        .route(
            "/orders/all",
            get(handlers::orders::list_all).route_layer(from_fn_with_state(
                Gate::any_permission(state, &["order:read_all"]),
                gate::enforce,
            )),
        )
        .route_layer(from_fn(require_session))
}

/// Bundled API documentation.
fn docs_routes() -> Router<AppState> {
    Router::new()
        .route("/swagger", get(handlers::docs::redirect))
        .route("/swagger/", get(handlers::docs::index))
        .route("/swagger/{file}", get(handlers::docs::file))
}
