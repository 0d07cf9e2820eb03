//! Integration tests for health checks, the documentation bundle and
//! unknown routes.

mod helpers;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health_and_version() {
    let app = helpers::TestApp::new().await;

    let health = app.request("GET", "/api/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["data"]["status"], "ok");

    let version = app.request("GET", "/version", None, None).await;
    assert_eq!(version.status, StatusCode::OK);
    assert!(version.body["data"]["version"].is_string());
}

#[tokio::test]
async fn test_readiness_with_memory_backends() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("GET", "/api/health/readiness", None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ready");
    assert_eq!(response.body["data"]["database"], "up");
    assert_eq!(response.body["data"]["cache"], "up");
}

#[tokio::test]
async fn test_docs_are_served() {
    let app = helpers::TestApp::new().await;

    let redirect = app.request("GET", "/swagger", None, None).await;
    assert!(redirect.status.is_redirection());
    assert_eq!(
        redirect.headers.get("location").and_then(|v| v.to_str().ok()),
        Some("/swagger/")
    );

    let index = app.request("GET", "/swagger/", None, None).await;
    assert_eq!(index.status, StatusCode::OK);
    assert!(
        index
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .starts_with("text/html")
    );

    let spec = app.request("GET", "/swagger/openapi.yaml", None, None).await;
    assert_eq!(spec.status, StatusCode::OK);
    assert!(spec.text.contains("openapi:"));

    let missing = app.request("GET", "/swagger/nope.js", None, None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_docs_can_be_disabled() {
    let mut config = shopkit_core::config::AppConfig::from_file("tests/fixtures/test_config.toml")
        .expect("Failed to load test config");
    config.server.enable_docs = false;
    let app = helpers::TestApp::with_config(config).await;

    let response = app.request("GET", "/swagger/", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route_uses_error_envelope() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/v1/nowhere", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "NOT_FOUND");
}
