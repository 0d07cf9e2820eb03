//! Integration tests for the catalog and order placement.

mod helpers;

use axum::http::StatusCode;
use serde_json::Value;

/// Create a product as `token` and return its id.
async fn create_product(
    app: &helpers::TestApp,
    token: &str,
    name: &str,
    price: f64,
    stock: i32,
) -> i64 {
    let response = app
        .request(
            "POST",
            "/api/v1/manage/products",
            Some(serde_json::json!({
                "name": name,
                "price": price,
                "stock_quantity": stock,
            })),
            Some(token),
        )
        .await;
    assert_eq!(
        response.status,
        StatusCode::CREATED,
        "Product creation failed: {:?}",
        response.body
    );
    response.body["data"]["id"].as_i64().expect("product id")
}

fn total_items(body: &Value) -> i64 {
    body["data"]["total_items"].as_i64().unwrap_or(-1)
}

#[tokio::test]
async fn test_manager_creates_product_with_derived_slug() {
    let app = helpers::TestApp::new().await;
    let (_, manager) = app.user_with_role("manager@example.com", "manager").await;

    create_product(&app, &manager, "Walnut Desk (Large)", 249.0, 3).await;

    let response = app.request("GET", "/api/v1/products", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(total_items(&response.body), 1);
    assert_eq!(response.body["data"]["items"][0]["slug"], "walnut-desk-large");

    let duplicate = app
        .request(
            "POST",
            "/api/v1/manage/products",
            Some(serde_json::json!({
                "name": "Another desk",
                "slug": "Walnut Desk Large",
                "price": 99.0,
            })),
            Some(&manager),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_customer_cannot_create_products() {
    let app = helpers::TestApp::new().await;
    let (_, customer) = app.register("shopper@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/v1/manage/products",
            Some(serde_json::json!({ "name": "Contraband", "price": 1.0 })),
            Some(&customer),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_public_catalog_filters() {
    let app = helpers::TestApp::new().await;
    let (_, manager) = app.user_with_role("manager@example.com", "manager").await;
    create_product(&app, &manager, "Oak Chair", 80.0, 10).await;
    create_product(&app, &manager, "Oak Table", 300.0, 0).await;
    create_product(&app, &manager, "Lamp", 25.0, 5).await;

    let response = app
        .request("GET", "/api/v1/products?search=oak", None, None)
        .await;
    assert_eq!(total_items(&response.body), 2);

    let response = app
        .request("GET", "/api/v1/products?search=oak&in_stock=true", None, None)
        .await;
    assert_eq!(total_items(&response.body), 1);
    assert_eq!(response.body["data"]["items"][0]["name"], "Oak Chair");

    let response = app
        .request("GET", "/api/v1/products?min_price=50&max_price=100", None, None)
        .await;
    assert_eq!(total_items(&response.body), 1);

    let response = app
        .request("GET", "/api/v1/products?sort=-price&per_page=1", None, None)
        .await;
    assert_eq!(total_items(&response.body), 3);
    assert_eq!(response.body["data"]["items"][0]["name"], "Oak Table");
}

#[tokio::test]
async fn test_place_order_prices_from_catalog_and_takes_stock() {
    let app = helpers::TestApp::new().await;
    let (_, manager) = app.user_with_role("manager@example.com", "manager").await;
    let chair = create_product(&app, &manager, "Oak Chair", 80.0, 10).await;
    let lamp = create_product(&app, &manager, "Lamp", 25.5, 5).await;
    let (user_id, customer) = app.register("buyer@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/v1/orders",
            Some(serde_json::json!({
                "payment_method": "card",
                "shipping_address": "1 Main St",
                "items": [
                    { "product_id": chair, "quantity": 2 },
                    { "product_id": lamp, "quantity": 1 },
                ],
            })),
            Some(&customer),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    let order = &response.body["data"];
    assert_eq!(order["user_id"], user_id.get());
    assert_eq!(order["status"], "pending");
    assert_eq!(order["total_price"].as_f64(), Some(185.5));
    assert_eq!(order["items"].as_array().map(Vec::len), Some(2));

    let response = app
        .request("GET", "/api/v1/products?search=chair", None, None)
        .await;
    assert_eq!(response.body["data"]["items"][0]["stock_quantity"], 8);

    let response = app
        .request("GET", "/api/v1/orders", None, Some(&customer))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(total_items(&response.body), 1);
}

#[tokio::test]
async fn test_insufficient_stock_conflicts_without_taking_stock() {
    let app = helpers::TestApp::new().await;
    let (_, manager) = app.user_with_role("manager@example.com", "manager").await;
    let chair = create_product(&app, &manager, "Oak Chair", 80.0, 10).await;
    let lamp = create_product(&app, &manager, "Lamp", 25.0, 1).await;
    let (_, customer) = app.register("greedy@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/v1/orders",
            Some(serde_json::json!({
                "payment_method": "card",
                "shipping_address": "1 Main St",
                "items": [
                    { "product_id": chair, "quantity": 1 },
                    { "product_id": lamp, "quantity": 2 },
                ],
            })),
            Some(&customer),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app
        .request("GET", "/api/v1/products?search=chair", None, None)
        .await;
    assert_eq!(response.body["data"]["items"][0]["stock_quantity"], 10);

    let response = app
        .request("GET", "/api/v1/orders", None, Some(&customer))
        .await;
    assert_eq!(total_items(&response.body), 0);
}

#[tokio::test]
async fn test_order_validation() {
    let app = helpers::TestApp::new().await;
    let (_, customer) = app.register("sloppy@example.com").await;

    let empty = app
        .request(
            "POST",
            "/api/v1/orders",
            Some(serde_json::json!({
                "payment_method": "card",
                "shipping_address": "1 Main St",
                "items": [],
            })),
            Some(&customer),
        )
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let unknown = app
        .request(
            "POST",
            "/api/v1/orders",
            Some(serde_json::json!({
                "payment_method": "card",
                "shipping_address": "1 Main St",
                "items": [{ "product_id": 4242, "quantity": 1 }],
            })),
            Some(&customer),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_order_listings_are_scoped() {
    let app = helpers::TestApp::new().await;
    let (_, manager) = app.user_with_role("manager@example.com", "manager").await;
    let lamp = create_product(&app, &manager, "Lamp", 25.0, 10).await;
    let (alice_id, alice) = app.register("alice@example.com").await;
    let (_, bob) = app.register("bob@example.com").await;

    for token in [&alice, &bob] {
        let response = app
            .request(
                "POST",
                "/api/v1/orders",
                Some(serde_json::json!({
                    "payment_method": "card",
                    "shipping_address": "1 Main St",
                    "items": [{ "product_id": lamp, "quantity": 1 }],
                })),
                Some(token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    // Asking for someone else's orders still only returns the caller's.
    let bob_view = app
        .request(
            "GET",
            &format!("/api/v1/orders?user_id={alice_id}"),
            None,
            Some(&bob),
        )
        .await;
    assert_eq!(total_items(&bob_view.body), 1);
    assert_ne!(bob_view.body["data"]["items"][0]["user_id"], alice_id.get());

    let all = app
        .request("GET", "/api/v1/orders/all", None, Some(&manager))
        .await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(total_items(&all.body), 2);

    let filtered = app
        .request(
            "GET",
            &format!("/api/v1/orders/all?user_id={alice_id}"),
            None,
            Some(&manager),
        )
        .await;
    assert_eq!(total_items(&filtered.body), 1);
}
