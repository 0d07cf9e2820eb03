//! Integration tests for registration, login and password changes.

mod helpers;

use axum::http::StatusCode;

use helpers::PASSWORD;

#[tokio::test]
async fn test_register_success() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/v1/register",
            Some(serde_json::json!({
                "first_name": "  Ada ",
                "last_name": "Lovelace",
                "email": "Ada@Example.COM",
                "password": PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], true);
    let user = &response.body["data"]["user"];
    assert_eq!(user["email"], "ada@example.com");
    assert_eq!(user["first_name"], "Ada");
    assert_eq!(user["status"], "active");
    assert!(user.get("password_hash").is_none());
    assert!(!response.token().is_empty());

    let cookie = response.set_cookie().expect("session cookie");
    assert!(cookie.starts_with("shopkit_session="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = helpers::TestApp::new().await;
    app.register("dup@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/v1/register",
            Some(serde_json::json!({
                "first_name": "Other",
                "last_name": "Person",
                "email": "DUP@example.com",
                "password": PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "CONFLICT");
    assert_eq!(response.body["message"], "email is not available");

    let users = app
        .state
        .services
        .admin
        .list_users(&shopkit_core::types::QuerySpec::new())
        .await
        .expect("list users");
    assert_eq!(users.total_items, 1);
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/v1/register",
            Some(serde_json::json!({
                "first_name": "Short",
                "last_name": "Pass",
                "email": "short@example.com",
                "password": "abc",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/v1/register",
            Some(serde_json::json!({
                "first_name": "No",
                "last_name": "Email",
                "email": "not-an-email",
                "password": PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["details"].get("email").is_some());
}

#[tokio::test]
async fn test_malformed_json_is_a_validation_error() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/v1/login",
            Some(serde_json::json!({ "email": "missing-password@example.com" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_success() {
    let app = helpers::TestApp::new().await;
    app.register("login@example.com").await;

    let token = app.login("LOGIN@example.com", PASSWORD).await;

    let response = app
        .request("GET", "/api/v1/restricted/me", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["email"], "login@example.com");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = helpers::TestApp::new().await;
    app.register("known@example.com").await;

    let wrong_password = app
        .request(
            "POST",
            "/api/v1/login",
            Some(serde_json::json!({
                "email": "known@example.com",
                "password": "wrong-password",
            })),
            None,
        )
        .await;
    let unknown_user = app
        .request(
            "POST",
            "/api/v1/login",
            Some(serde_json::json!({
                "email": "nobody@example.com",
                "password": PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body["message"], "invalid email or password");
    assert_eq!(wrong_password.body, unknown_user.body);
}

#[tokio::test]
async fn test_inactive_user_cannot_login() {
    let app = helpers::TestApp::new().await;
    let (user_id, _) = app.register("dormant@example.com").await;

    app.state
        .services
        .admin
        .update_status(None, user_id, shopkit_entity::user::UserStatus::Inactive)
        .await
        .expect("deactivate");

    let response = app
        .request(
            "POST",
            "/api/v1/login",
            Some(serde_json::json!({
                "email": "dormant@example.com",
                "password": PASSWORD,
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password_wrong_current_password() {
    let app = helpers::TestApp::new().await;
    let (user_id, token) = app.register("changer@example.com").await;

    let me = app
        .request("GET", "/api/v1/restricted/me", None, Some(&token))
        .await;
    assert_eq!(me.status, StatusCode::OK);
    let warmed = app.cached_permissions(user_id).await;
    assert!(warmed.is_some());

    let before = app
        .state
        .services
        .admin
        .user_access(user_id)
        .await
        .expect("user access")
        .user;

    let response = app
        .request(
            "POST",
            "/api/v1/restricted/change-password",
            Some(serde_json::json!({
                "current_password": "not-my-password",
                "new_password": "another-long-password",
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "current password is incorrect");

    let after = app
        .state
        .services
        .admin
        .user_access(user_id)
        .await
        .expect("user access")
        .user;
    assert_eq!(before.updated_at, after.updated_at);
    // A rejected change leaves the cached snapshot alone.
    assert_eq!(app.cached_permissions(user_id).await, warmed);

    // The old password still works.
    app.login("changer@example.com", PASSWORD).await;
}

#[tokio::test]
async fn test_change_password_success() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.register("rotate@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/v1/restricted/change-password",
            Some(serde_json::json!({
                "current_password": PASSWORD,
                "new_password": "another-long-password",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let old = app
        .request(
            "POST",
            "/api/v1/login",
            Some(serde_json::json!({
                "email": "rotate@example.com",
                "password": PASSWORD,
            })),
            None,
        )
        .await;
    assert_eq!(old.status, StatusCode::UNAUTHORIZED);

    app.login("rotate@example.com", "another-long-password").await;
}

#[tokio::test]
async fn test_cookie_session_is_accepted() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.register("cookie@example.com").await;

    let response = app
        .request_with_headers(
            "GET",
            "/api/v1/restricted/",
            None,
            &[("Cookie", format!("shopkit_session={token}"))],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(
        response.body["data"]["message"]
            .as_str()
            .unwrap_or_default()
            .starts_with("authenticated as user")
    );
}
