//! Shared test helpers for integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use shopkit_api::AppState;
use shopkit_cache::keys;
use shopkit_core::config::AppConfig;
use shopkit_core::traits::cache::CacheProvider;
use shopkit_core::types::{PermissionId, RoleId, UserId};
use shopkit_database::RbacStore;
use shopkit_entity::rbac::NewGrant;

/// Password used for every account created through the helpers.
pub const PASSWORD: &str = "correct-horse-battery";

/// Test application context backed by the in-memory stores.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for arranging data behind the API's back
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application with empty stores and seeded
    /// reference roles and permissions.
    pub async fn new() -> Self {
        let config = AppConfig::from_file("tests/fixtures/test_config.toml")
            .expect("Failed to load test config");
        Self::with_config(config).await
    }

    pub async fn with_config(config: AppConfig) -> Self {
        let state = shopkit_api::build_state(config, false)
            .await
            .expect("Failed to build application state");
        let router = shopkit_api::build_app(state.clone());
        Self { router, state }
    }

    /// Register `email` through the API and return its user id and token.
    pub async fn register(&self, email: &str) -> (UserId, String) {
        let response = self
            .request(
                "POST",
                "/api/v1/register",
                Some(serde_json::json!({
                    "first_name": "Test",
                    "last_name": "User",
                    "email": email,
                    "password": PASSWORD,
                })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Registration failed: {:?}",
            response.body
        );
        (response.user_id(), response.token())
    }

    /// Log in through the API and return the session token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/v1/login",
                Some(serde_json::json!({
                    "email": email,
                    "password": password,
                })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );
        response.token()
    }

    /// Register a user holding `role` in addition to the default one.
    pub async fn user_with_role(&self, email: &str, role: &str) -> (UserId, String) {
        let (user_id, token) = self.register(email).await;
        let assigned = self
            .state
            .services
            .accounts
            .assign_named_role(user_id, role, None)
            .await
            .expect("Failed to assign role");
        assert!(assigned, "role {role} does not exist");
        (user_id, token)
    }

    pub async fn role_id(&self, name: &str) -> RoleId {
        self.state
            .services
            .admin
            .list_roles()
            .await
            .expect("Failed to list roles")
            .into_iter()
            .find(|r| r.name == name)
            .expect("Unknown role")
            .id
    }

    /// Raw `user_perms:{id}` entry, if one is cached.
    pub async fn cached_permissions(&self, user_id: UserId) -> Option<String> {
        self.state
            .services
            .cache
            .get(&keys::user_permissions(user_id))
            .await
            .expect("Failed to read cache")
    }

    /// Grant a permission straight through the store. Unlike the admin
    /// service this leaves any cached snapshot in place.
    pub async fn grant_in_store(&self, user_id: UserId, permission: &str) {
        let permission_id = self.permission_id(permission).await;
        self.state
            .services
            .stores
            .rbac
            .grant_permission(&NewGrant {
                user_id,
                target: permission_id,
                granted_by: None,
                expires_at: None,
            })
            .await
            .expect("Failed to grant permission");
    }

    pub async fn permission_id(&self, name: &str) -> PermissionId {
        self.state
            .services
            .admin
            .list_permissions()
            .await
            .expect("Failed to list permissions")
            .into_iter()
            .find(|p| p.name == name)
            .expect("Unknown permission")
            .id
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut headers = Vec::new();
        if let Some(token) = token {
            headers.push(("Authorization", format!("Bearer {token}")));
        }
        self.request_with_headers(method, path, body, &headers).await
    }

    /// Make an HTTP request carrying arbitrary headers.
    pub async fn request_with_headers(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, String)],
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        for (name, value) in headers {
            req = req.header(*name, value.as_str());
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            text,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON body, `Null` when the body is not JSON
    pub body: Value,
    /// Raw body text
    pub text: String,
}

impl TestResponse {
    /// `data.token` of a session response.
    pub fn token(&self) -> String {
        self.body["data"]["token"]
            .as_str()
            .expect("No token in session response")
            .to_string()
    }

    /// `data.user.id` of a session response.
    pub fn user_id(&self) -> UserId {
        UserId::new(
            self.body["data"]["user"]["id"]
                .as_i64()
                .expect("No user id in session response"),
        )
    }

    /// The `error` code of an error envelope.
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }

    /// The value of the `Set-Cookie` header, if any.
    pub fn set_cookie(&self) -> Option<&str> {
        self.headers
            .get("set-cookie")
            .and_then(|v| v.to_str().ok())
    }
}
