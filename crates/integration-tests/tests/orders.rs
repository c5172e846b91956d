//! Integration tests for order placement and stock accounting.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - A seeded catalog (cargo run -p akubata-cli -- seed)
//! - The API server running (cargo run -p akubata-api)
//!
//! Run with: cargo test -p akubata-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:5001".to_string())
}

/// Test helper: sign up a fresh account and return its bearer token.
async fn signup(client: &Client) -> String {
    let base_url = api_base_url();
    let resp = client
        .post(format!("{base_url}/api/auth/signup"))
        .json(&json!({
            "first_name": "Test",
            "last_name": "User",
            "email": format!("it-{}@example.test", Uuid::new_v4().simple()),
            "password": "correct horse battery",
            "confirm_password": "correct horse battery",
        }))
        .send()
        .await
        .expect("Failed to sign up test user");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse signup response");
    body["token"].as_str().expect("signup returns a token").to_string()
}

/// Test helper: pick a seeded product with stock to order against.
async fn stocked_product(client: &Client, token: &str) -> Value {
    let base_url = api_base_url();
    let resp = client
        .get(format!("{base_url}/api/products"))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);
    let products: Vec<Value> = resp.json().await.expect("Failed to parse product list");
    products
        .into_iter()
        .find(|p| p["stock_quantity"].as_i64().unwrap_or(0) >= 2)
        .expect("catalog is empty; run `cargo run -p akubata-cli -- seed` first")
}

/// Test helper: current stock for a product.
async fn stock_of(client: &Client, token: &str, product_id: &str) -> i64 {
    let base_url = api_base_url();
    let resp = client
        .get(format!("{base_url}/api/products/{product_id}"))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to fetch product");
    assert_eq!(resp.status(), StatusCode::OK);
    let product: Value = resp.json().await.expect("Failed to parse product");
    product["stock_quantity"].as_i64().expect("stock_quantity present")
}

// ============================================================================
// Order Placement Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server, database, and seeded catalog"]
async fn test_order_decrements_stock_and_captures_price() {
    let client = Client::new();
    let token = signup(&client).await;
    let base_url = api_base_url();

    let product = stocked_product(&client, &token).await;
    let product_id = product["id"].as_str().unwrap();
    let before = stock_of(&client, &token, product_id).await;

    let resp = client
        .post(format!("{base_url}/api/orders"))
        .bearer_auth(&token)
        .json(&json!({
            "payment_method": "credit_card",
            "items": [{ "product_id": product_id, "quantity": 2 }],
        }))
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(resp.status(), StatusCode::OK);
    let order: Value = resp.json().await.expect("Failed to parse order");

    assert_eq!(order["order_status"], "pending");
    let items = order["items"].as_array().expect("order has items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 2);
    // Unit price is captured on the line item at order time.
    assert_eq!(items[0]["price"], product["unit_price"]);

    assert_eq!(stock_of(&client, &token, product_id).await, before - 2);
}

#[tokio::test]
#[ignore = "Requires running API server, database, and seeded catalog"]
async fn test_order_beyond_stock_is_rejected() {
    let client = Client::new();
    let token = signup(&client).await;
    let base_url = api_base_url();

    let product = stocked_product(&client, &token).await;
    let product_id = product["id"].as_str().unwrap();
    let before = stock_of(&client, &token, product_id).await;

    let resp = client
        .post(format!("{base_url}/api/orders"))
        .bearer_auth(&token)
        .json(&json!({
            "payment_method": "credit_card",
            "items": [{ "product_id": product_id, "quantity": before + 1 }],
        }))
        .send()
        .await
        .expect("Failed to send order");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Nothing was decremented by the failed attempt.
    assert_eq!(stock_of(&client, &token, product_id).await, before);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_order_with_no_items_is_rejected() {
    let client = Client::new();
    let token = signup(&client).await;
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/api/orders"))
        .bearer_auth(&token)
        .json(&json!({ "payment_method": "check", "items": [] }))
        .send()
        .await
        .expect("Failed to send order");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server, database, and seeded catalog"]
async fn test_deleting_an_order_restores_stock() {
    let client = Client::new();
    let token = signup(&client).await;
    let base_url = api_base_url();

    let product = stocked_product(&client, &token).await;
    let product_id = product["id"].as_str().unwrap();
    let before = stock_of(&client, &token, product_id).await;

    let resp = client
        .post(format!("{base_url}/api/orders"))
        .bearer_auth(&token)
        .json(&json!({
            "payment_method": "bank_transfer",
            "items": [{ "product_id": product_id, "quantity": 1 }],
        }))
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(resp.status(), StatusCode::OK);
    let order: Value = resp.json().await.expect("Failed to parse order");
    assert_eq!(stock_of(&client, &token, product_id).await, before - 1);

    let resp = client
        .delete(format!("{base_url}/api/orders/{}", order["id"].as_str().unwrap()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete order");
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(stock_of(&client, &token, product_id).await, before);
}

#[tokio::test]
#[ignore = "Requires running API server, database, and seeded catalog"]
async fn test_delete_restores_stock_across_duplicate_product_lines() {
    let client = Client::new();
    let token = signup(&client).await;
    let base_url = api_base_url();

    let product = stocked_product(&client, &token).await;
    let product_id = product["id"].as_str().unwrap();
    let before = stock_of(&client, &token, product_id).await;

    let resp = client
        .post(format!("{base_url}/api/orders"))
        .bearer_auth(&token)
        .json(&json!({
            "payment_method": "credit_card",
            "items": [{ "product_id": product_id, "quantity": 1 }],
        }))
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(resp.status(), StatusCode::OK);
    let order: Value = resp.json().await.expect("Failed to parse order");
    let order_id = order["id"].as_str().unwrap();

    // Appending the same product creates a second line item for it.
    let resp = client
        .post(format!("{base_url}/api/orders/{order_id}/items"))
        .bearer_auth(&token)
        .json(&json!({ "product_id": product_id, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to append item");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(stock_of(&client, &token, product_id).await, before - 2);

    let resp = client
        .delete(format!("{base_url}/api/orders/{order_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete order");
    assert_eq!(resp.status(), StatusCode::OK);

    // Both line items count toward the restore, not just one of them.
    assert_eq!(stock_of(&client, &token, product_id).await, before);
}

// ============================================================================
// Visibility & Role Gating Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server, database, and seeded catalog"]
async fn test_orders_are_owner_scoped_for_basic_users() {
    let client = Client::new();
    let owner = signup(&client).await;
    let stranger = signup(&client).await;
    let base_url = api_base_url();

    let product = stocked_product(&client, &owner).await;
    let resp = client
        .post(format!("{base_url}/api/orders"))
        .bearer_auth(&owner)
        .json(&json!({
            "payment_method": "credit_card",
            "items": [{ "product_id": product["id"], "quantity": 1 }],
        }))
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(resp.status(), StatusCode::OK);
    let order: Value = resp.json().await.expect("Failed to parse order");
    let order_id = order["id"].as_str().unwrap();

    // A stranger cannot read it and does not see it in their listing.
    let resp = client
        .get(format!("{base_url}/api/orders/{order_id}"))
        .bearer_auth(&stranger)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client
        .get(format!("{base_url}/api/orders"))
        .bearer_auth(&stranger)
        .send()
        .await
        .expect("Failed to list orders");
    let orders: Vec<Value> = resp.json().await.expect("Failed to parse order list");
    assert!(orders.iter().all(|o| o["id"] != order_id));
}

#[tokio::test]
#[ignore = "Requires running API server, database, and seeded catalog"]
async fn test_basic_user_cannot_update_order_status() {
    let client = Client::new();
    let token = signup(&client).await;
    let base_url = api_base_url();

    let product = stocked_product(&client, &token).await;
    let resp = client
        .post(format!("{base_url}/api/orders"))
        .bearer_auth(&token)
        .json(&json!({
            "payment_method": "credit_card",
            "items": [{ "product_id": product["id"], "quantity": 1 }],
        }))
        .send()
        .await
        .expect("Failed to place order");
    let order: Value = resp.json().await.expect("Failed to parse order");

    let resp = client
        .put(format!(
            "{base_url}/api/orders/{}/status/completed",
            order["id"].as_str().unwrap()
        ))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send status update");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_basic_user_cannot_create_products() {
    let client = Client::new();
    let token = signup(&client).await;
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/api/products"))
        .bearer_auth(&token)
        .json(&json!({
            "product_name": "Contraband Widget",
            "unit_price": "9.99",
        }))
        .send()
        .await
        .expect("Failed to send product create");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
