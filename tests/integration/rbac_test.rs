//! Integration tests for role and permission gates and grant administration.

mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};

#[tokio::test]
async fn test_anonymous_requests_are_unauthorized() {
    let app = helpers::TestApp::new().await;

    for (method, path) in [
        ("GET", "/api/v1/restricted/"),
        ("GET", "/api/v1/restricted/me"),
        ("GET", "/api/v1/admin/users"),
        ("GET", "/api/v1/manage/products"),
        ("GET", "/api/v1/orders"),
        ("GET", "/api/v1/orders/all"),
    ] {
        let response = app.request(method, path, None, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{method} {path}");
        assert_eq!(response.error_code(), "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("GET", "/api/v1/restricted/me", None, Some("not-a-real-token"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_customer_is_forbidden_from_admin_routes() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.register("shopper@example.com").await;

    for (method, path) in [
        ("GET", "/api/v1/admin/users"),
        ("GET", "/api/v1/admin/roles"),
        ("GET", "/api/v1/manage/products"),
        ("GET", "/api/v1/orders/all"),
        ("POST", "/api/v1/restricted/logout/1"),
    ] {
        let response = app.request(method, path, None, Some(&token)).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{method} {path}");
        assert_eq!(response.error_code(), "FORBIDDEN");
    }
}

#[tokio::test]
async fn test_admin_lists_users() {
    let app = helpers::TestApp::new().await;
    let (_, admin) = app.user_with_role("admin@example.com", "admin").await;
    app.register("alice@example.com").await;
    app.register("bob@example.com").await;

    let response = app
        .request(
            "GET",
            "/api/v1/admin/users?email=alice&sort=-created_at",
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let page = &response.body["data"];
    assert_eq!(page["total_items"], 1);
    assert_eq!(page["items"][0]["email"], "alice@example.com");

    let response = app
        .request("GET", "/api/v1/admin/users?per_page=2", None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total_items"], 3);
    assert_eq!(response.body["data"]["items"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_role_without_permission_is_forbidden() {
    let app = helpers::TestApp::new().await;
    let (manager_id, _) = app.user_with_role("manager@example.com", "manager").await;
    let (_, admin) = app.user_with_role("admin@example.com", "admin").await;

    // A manager passes the staff role gate but has no `user:read_all`, and
    // never passes the admin role gate.
    let token = app.login("manager@example.com", helpers::PASSWORD).await;
    let response = app
        .request("GET", "/api/v1/admin/users", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "GET",
            &format!("/api/v1/admin/users/{manager_id}/roles"),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let roles = response.body["data"]["roles"]
        .as_array()
        .expect("roles array")
        .clone();
    assert!(roles.contains(&serde_json::json!("manager")));
    assert!(roles.contains(&serde_json::json!("customer")));
}

#[tokio::test]
async fn test_wildcard_permission_satisfies_every_check() {
    let app = helpers::TestApp::new().await;
    let (_, root) = app.user_with_role("root@example.com", "super_admin").await;

    for path in [
        "/api/v1/admin/users",
        "/api/v1/admin/permissions",
        "/api/v1/manage/products",
        "/api/v1/orders/all",
    ] {
        let response = app.request("GET", path, None, Some(&root)).await;
        assert_eq!(response.status, StatusCode::OK, "GET {path}");
    }
}

#[tokio::test]
async fn test_direct_wildcard_grant_satisfies_permission_gates() {
    let app = helpers::TestApp::new().await;
    let (_, admin) = app.user_with_role("admin@example.com", "admin").await;
    let (user_id, token) = app.register("power@example.com").await;

    let response = app
        .request("GET", "/api/v1/orders/all", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let wildcard = app.permission_id("*:*").await;
    let response = app
        .request(
            "POST",
            "/api/v1/admin/users/grant-permission",
            Some(serde_json::json!({ "user_id": user_id, "permission_id": wildcard })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", "/api/v1/orders/all", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_assign_and_remove_role_take_effect_immediately() {
    let app = helpers::TestApp::new().await;
    let (_, admin) = app.user_with_role("admin@example.com", "admin").await;
    let (user_id, token) = app.register("staff@example.com").await;
    let manager = app.role_id("manager").await;

    // Warm the permission cache with the customer-only snapshot.
    let response = app
        .request("GET", "/api/v1/manage/products", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "POST",
            "/api/v1/admin/users/assign-role",
            Some(serde_json::json!({ "user_id": user_id, "role_id": manager })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", "/api/v1/manage/products", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "POST",
            "/api/v1/admin/users/remove-role",
            Some(serde_json::json!({ "user_id": user_id, "role_id": manager })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", "/api/v1/manage/products", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "POST",
            "/api/v1/admin/users/remove-role",
            Some(serde_json::json!({ "user_id": user_id, "role_id": manager })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_expired_direct_grant_is_ignored() {
    let app = helpers::TestApp::new().await;
    let (_, admin) = app.user_with_role("admin@example.com", "admin").await;
    let (user_id, token) = app.register("expired@example.com").await;
    let read_all = app.permission_id("order:read_all").await;

    let response = app
        .request(
            "POST",
            "/api/v1/admin/users/grant-permission",
            Some(serde_json::json!({
                "user_id": user_id,
                "permission_id": read_all,
                "expires_at": Utc::now() - Duration::minutes(5),
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", "/api/v1/restricted/me", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["data"]["permissions"],
        serde_json::json!(["order:create", "order:read", "product:read"])
    );
    assert_eq!(response.body["data"]["roles"], serde_json::json!(["customer"]));

    let response = app
        .request("GET", "/api/v1/orders/all", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_revoke_permission_without_grant_is_not_found() {
    let app = helpers::TestApp::new().await;
    let (_, admin) = app.user_with_role("admin@example.com", "admin").await;
    let (user_id, _) = app.register("plain@example.com").await;
    let read_all = app.permission_id("order:read_all").await;

    let response = app
        .request(
            "POST",
            "/api/v1/admin/users/revoke-permission",
            Some(serde_json::json!({ "user_id": user_id, "permission_id": read_all })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_admin_deactivates_user() {
    let app = helpers::TestApp::new().await;
    let (_, admin) = app.user_with_role("admin@example.com", "admin").await;
    let (user_id, token) = app.register("leaving@example.com").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/v1/admin/users/{user_id}/status"),
            Some(serde_json::json!({ "status": "inactive" })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "inactive");

    // Deactivation ends the user's sessions.
    let response = app
        .request("GET", "/api/v1/restricted/me", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("GET", "/api/v1/admin/users?status=inactive", None, Some(&admin))
        .await;
    assert_eq!(response.body["data"]["total_items"], 1);
}

#[tokio::test]
async fn test_role_and_permission_catalogs() {
    let app = helpers::TestApp::new().await;
    let (_, admin) = app.user_with_role("admin@example.com", "admin").await;

    let roles = app
        .request("GET", "/api/v1/admin/roles", None, Some(&admin))
        .await;
    assert_eq!(roles.status, StatusCode::OK);
    assert_eq!(roles.body["data"].as_array().map(Vec::len), Some(4));

    let permissions = app
        .request("GET", "/api/v1/admin/permissions", None, Some(&admin))
        .await;
    assert_eq!(permissions.status, StatusCode::OK);
    assert_eq!(permissions.body["data"].as_array().map(Vec::len), Some(12));
}
