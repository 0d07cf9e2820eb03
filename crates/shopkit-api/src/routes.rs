//! Human-readable listing of every route and the guard in front of it.
//!
//! Kept next to [`crate::router`]; the CLI `routes` command prints it.

use serde::Serialize;

/// One row of the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub guard: &'static str,
}

const fn route(method: &'static str, path: &'static str, guard: &'static str) -> RouteInfo {
    RouteInfo {
        method,
        path,
        guard,
    }
}

const ADMIN: &str = "role admin|super_admin";

pub static ROUTE_TABLE: &[RouteInfo] = &[
    route("GET", "/version", "none"),
    route("GET", "/api/health", "none"),
    route("GET", "/api/health/readiness", "none"),
    route("POST", "/api/v1/register", "none"),
    route("POST", "/api/v1/login", "none"),
    route("POST", "/api/v1/logout", "none"),
    route("GET", "/api/v1/restricted/", "session"),
    route("GET", "/api/v1/restricted/me", "session"),
    route("POST", "/api/v1/restricted/change-password", "session"),
    route("GET", "/api/v1/restricted/csrf", "session"),
    route("POST", "/api/v1/restricted/logout/{user_id}", "session + admin:users"),
    route("GET", "/api/v1/admin/users", "role admin|super_admin + user:read_all"),
    route("GET", "/api/v1/admin/users/{user_id}/roles", "role admin|super_admin + user:read"),
    route("PUT", "/api/v1/admin/users/{user_id}/status", "role admin|super_admin + user:write"),
    route("POST", "/api/v1/admin/users/assign-role", "role admin|super_admin + role:assign"),
    route("POST", "/api/v1/admin/users/remove-role", "role admin|super_admin + role:assign"),
    route(
        "POST",
        "/api/v1/admin/users/grant-permission",
        "role admin|super_admin + permission:assign",
    ),
    route(
        "POST",
        "/api/v1/admin/users/revoke-permission",
        "role admin|super_admin + permission:assign",
    ),
    route("GET", "/api/v1/admin/roles", ADMIN),
    route("GET", "/api/v1/admin/permissions", ADMIN),
    route("GET", "/api/v1/manage/products", "role admin|super_admin|manager"),
    route(
        "POST",
        "/api/v1/manage/products",
        "role admin|super_admin|manager + product:create",
    ),
    route("GET", "/api/v1/products", "none"),
    route("GET", "/api/v1/orders", "session"),
    route("POST", "/api/v1/orders", "session + order:create"),
    route("GET", "/api/v1/orders/all", "session + order:read_all"),
    route("GET", "/swagger/", "none (docs enabled)"),
    route("GET", "/swagger/{file}", "none (docs enabled)"),
];
