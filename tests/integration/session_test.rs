//! Integration tests for the session lifecycle: rotation, logout and
//! forced logout.

mod helpers;

use axum::http::StatusCode;

use helpers::PASSWORD;
use serde_json::Value;

fn has_permission(me: &Value, permission: &str) -> bool {
    me["data"]["permissions"]
        .as_array()
        .is_some_and(|all| all.iter().any(|p| p == permission))
}

#[tokio::test]
async fn test_logout_destroys_session() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.register("bye@example.com").await;

    let response = app
        .request("POST", "/api/v1/logout", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let cookie = response.set_cookie().expect("removal cookie");
    assert!(cookie.starts_with("shopkit_session="));

    let response = app
        .request("GET", "/api/v1/restricted/me", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_without_session_is_noop() {
    let app = helpers::TestApp::new().await;

    let response = app.request("POST", "/api/v1/logout", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["message"], "logged out");
}

#[tokio::test]
async fn test_login_rotates_presented_token() {
    let app = helpers::TestApp::new().await;
    let (_, first) = app.register("rotating@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/v1/login",
            Some(serde_json::json!({
                "email": "rotating@example.com",
                "password": PASSWORD,
            })),
            Some(&first),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let second = response.token();
    assert_ne!(first, second);

    let stale = app
        .request("GET", "/api/v1/restricted/me", None, Some(&first))
        .await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);

    let fresh = app
        .request("GET", "/api/v1/restricted/me", None, Some(&second))
        .await;
    assert_eq!(fresh.status, StatusCode::OK);
}

#[tokio::test]
async fn test_separate_logins_keep_separate_sessions() {
    let app = helpers::TestApp::new().await;
    app.register("devices@example.com").await;

    let laptop = app.login("devices@example.com", PASSWORD).await;
    let phone = app.login("devices@example.com", PASSWORD).await;

    for token in [&laptop, &phone] {
        let response = app
            .request("GET", "/api/v1/restricted/me", None, Some(token))
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_force_logout_destroys_every_session_of_target() {
    let app = helpers::TestApp::new().await;
    let (_, admin) = app.user_with_role("admin@example.com", "admin").await;
    let (target, first) = app.register("target@example.com").await;
    let second = app.login("target@example.com", PASSWORD).await;

    // Warm the target's permission cache entry, then change their grants
    // behind the cache's back.
    let me = app
        .request("GET", "/api/v1/restricted/me", None, Some(&first))
        .await;
    assert_eq!(me.status, StatusCode::OK);
    app.grant_in_store(target, "order:read_all").await;
    let stale = app
        .request("GET", "/api/v1/restricted/me", None, Some(&first))
        .await;
    assert!(!has_permission(&stale.body, "order:read_all"));
    assert!(app.cached_permissions(target).await.is_some());

    let response = app
        .request(
            "POST",
            &format!("/api/v1/restricted/logout/{target}"),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["sessions_destroyed"], 2);
    assert!(app.cached_permissions(target).await.is_none());

    for token in [&first, &second] {
        let response = app
            .request("GET", "/api/v1/restricted/me", None, Some(token))
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }

    // The admin is unaffected.
    let response = app
        .request("GET", "/api/v1/restricted/me", None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    // The target's next session resolves grants afresh.
    let token = app.login("target@example.com", PASSWORD).await;
    let response = app
        .request("GET", "/api/v1/restricted/me", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["roles"], serde_json::json!(["customer"]));
    assert!(has_permission(&response.body, "order:read_all"));
}

#[tokio::test]
async fn test_force_logout_without_sessions_is_not_found() {
    let app = helpers::TestApp::new().await;
    let (_, admin) = app.user_with_role("admin@example.com", "admin").await;
    let (target, token) = app.register("quiet@example.com").await;

    app.request("POST", "/api/v1/logout", None, Some(&token))
        .await;

    let response = app
        .request(
            "POST",
            &format!("/api/v1/restricted/logout/{target}"),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_csrf_token_is_issued_per_request() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.register("csrf@example.com").await;

    let first = app
        .request("GET", "/api/v1/restricted/csrf", None, Some(&token))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    let csrf = first.body["data"]["csrf_token"]
        .as_str()
        .expect("csrf token")
        .to_string();
    assert_eq!(csrf.len(), 43);
    assert!(!csrf.contains('='));

    let second = app
        .request("GET", "/api/v1/restricted/csrf", None, Some(&token))
        .await;
    assert_ne!(second.body["data"]["csrf_token"], first.body["data"]["csrf_token"]);
}
