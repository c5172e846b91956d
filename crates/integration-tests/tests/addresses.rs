//! Integration tests for the address book.
//!
//! The load-bearing property here is the single-default invariant: at most
//! one address per user has `is_default = true` at any committed state, no
//! matter which path (create, update, set-default) changed it.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
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

/// Test helper: create an address, returning the response body.
async fn create_address(client: &Client, token: &str, line1: &str, is_default: bool) -> Value {
    let resp = create_address_raw(client, token, line1, is_default).await;
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Failed to parse address response")
}

/// Test helper: create an address, returning the raw response unasserted.
async fn create_address_raw(
    client: &Client,
    token: &str,
    line1: &str,
    is_default: bool,
) -> reqwest::Response {
    let base_url = api_base_url();
    client
        .post(format!("{base_url}/api/addresses"))
        .bearer_auth(token)
        .json(&json!({
            "recipient_first_name": "Test",
            "phone_number": "+1 555 0100",
            "address_line1": line1,
            "city": "Portsmouth",
            "state": "NH",
            "zip_code": "03801",
            "country": "US",
            "is_default": is_default,
        }))
        .send()
        .await
        .expect("Failed to create address")
}

/// Test helper: list addresses and count how many are default.
async fn default_count(client: &Client, token: &str) -> usize {
    let base_url = api_base_url();
    let resp = client
        .get(format!("{base_url}/api/addresses"))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to list addresses");
    assert_eq!(resp.status(), StatusCode::OK);
    let addresses: Vec<Value> = resp.json().await.expect("Failed to parse address list");
    addresses
        .iter()
        .filter(|a| a["is_default"].as_bool() == Some(true))
        .count()
}

// ============================================================================
// Single-Default Invariant Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_create_default_clears_previous_default() {
    let client = Client::new();
    let token = signup(&client).await;

    let first = create_address(&client, &token, "1 First Street", true).await;
    assert_eq!(first["is_default"], true);

    let second = create_address(&client, &token, "2 Second Street", true).await;
    assert_eq!(second["is_default"], true);
    assert_eq!(default_count(&client, &token).await, 1);

    // GET /default resolves to the most recent winner.
    let base_url = api_base_url();
    let resp = client
        .get(format!("{base_url}/api/addresses/default"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch default address");
    let body: Value = resp.json().await.expect("Failed to parse default address");
    assert_eq!(body["id"], second["id"]);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_set_default_endpoint_moves_the_flag() {
    let client = Client::new();
    let token = signup(&client).await;
    let base_url = api_base_url();

    let first = create_address(&client, &token, "1 First Street", true).await;
    let second = create_address(&client, &token, "2 Second Street", false).await;

    let resp = client
        .patch(format!("{base_url}/api/addresses/{}/default", second["id"].as_str().unwrap()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to set default");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(updated["is_default"], true);
    assert_eq!(default_count(&client, &token).await, 1);

    // The old default lost the flag.
    let resp = client
        .get(format!("{base_url}/api/addresses/{}", first["id"].as_str().unwrap()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch address");
    let body: Value = resp.json().await.expect("Failed to parse address");
    assert_eq!(body["is_default"], false);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_update_with_is_default_true_steals_the_flag() {
    let client = Client::new();
    let token = signup(&client).await;
    let base_url = api_base_url();

    let _first = create_address(&client, &token, "1 First Street", true).await;
    let second = create_address(&client, &token, "2 Second Street", false).await;

    let resp = client
        .put(format!("{base_url}/api/addresses/{}", second["id"].as_str().unwrap()))
        .bearer_auth(&token)
        .json(&json!({ "is_default": true, "label": "Office" }))
        .send()
        .await
        .expect("Failed to update address");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(default_count(&client, &token).await, 1);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_concurrent_set_default_leaves_exactly_one_default() {
    let client = Client::new();
    let token = signup(&client).await;
    let base_url = api_base_url();

    let first = create_address(&client, &token, "1 First Street", false).await;
    let second = create_address(&client, &token, "2 Second Street", false).await;

    let patch = |id: String| {
        let client = client.clone();
        let token = token.clone();
        let base_url = base_url.clone();
        async move {
            client
                .patch(format!("{base_url}/api/addresses/{id}/default"))
                .bearer_auth(&token)
                .send()
                .await
                .expect("Failed to set default")
        }
    };

    let (a, b) = tokio::join!(
        patch(first["id"].as_str().unwrap().to_string()),
        patch(second["id"].as_str().unwrap().to_string()),
    );
    assert_eq!(a.status(), StatusCode::OK);
    assert_eq!(b.status(), StatusCode::OK);

    // Whichever write landed last won; the loser's flag was cleared.
    assert_eq!(default_count(&client, &token).await, 1);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_concurrent_default_creates_leave_exactly_one_default() {
    let client = Client::new();
    let token = signup(&client).await;

    let (a, b) = tokio::join!(
        create_address_raw(&client, &token, "3 Third Street", true),
        create_address_raw(&client, &token, "4 Fourth Street", true),
    );

    // A loser that hit the default-flag race gets a conflict naming the
    // race, never the duplicate-address message.
    for resp in [a, b] {
        let status = resp.status();
        assert!(status == StatusCode::OK || status == StatusCode::CONFLICT);
        if status == StatusCode::CONFLICT {
            let body: Value = resp.json().await.expect("Failed to parse conflict body");
            let message = body["message"].as_str().unwrap_or_default();
            assert!(message.contains("default"), "unexpected conflict: {message}");
        }
    }

    assert_eq!(default_count(&client, &token).await, 1);
}

// ============================================================================
// Validation & Conflict Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_duplicate_address_is_a_conflict() {
    let client = Client::new();
    let token = signup(&client).await;

    let _first = create_address(&client, &token, "1 First Street", false).await;

    let base_url = api_base_url();
    let resp = client
        .post(format!("{base_url}/api/addresses"))
        .bearer_auth(&token)
        .json(&json!({
            "recipient_first_name": "Test",
            "phone_number": "+1 555 0100",
            "address_line1": "1 First Street",
            "city": "Portsmouth",
            "state": "NH",
            "zip_code": "03801",
            "country": "US",
        }))
        .send()
        .await
        .expect("Failed to send duplicate address");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_blank_required_field_is_rejected() {
    let client = Client::new();
    let token = signup(&client).await;
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/api/addresses"))
        .bearer_auth(&token)
        .json(&json!({
            "recipient_first_name": "Test",
            "phone_number": "+1 555 0100",
            "address_line1": "",
            "city": "Portsmouth",
            "state": "NH",
            "zip_code": "03801",
            "country": "US",
        }))
        .send()
        .await
        .expect("Failed to send address");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_empty_update_is_rejected() {
    let client = Client::new();
    let token = signup(&client).await;
    let base_url = api_base_url();

    let address = create_address(&client, &token, "1 First Street", false).await;
    let resp = client
        .put(format!("{base_url}/api/addresses/{}", address["id"].as_str().unwrap()))
        .bearer_auth(&token)
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send update");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Owner Scoping Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_other_users_addresses_are_invisible() {
    let client = Client::new();
    let owner = signup(&client).await;
    let intruder = signup(&client).await;
    let base_url = api_base_url();

    let address = create_address(&client, &owner, "1 First Street", true).await;
    let id = address["id"].as_str().unwrap();

    // Reads, updates, deletes and set-default all 404 for a non-owner.
    let resp = client
        .get(format!("{base_url}/api/addresses/{id}"))
        .bearer_auth(&intruder)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .put(format!("{base_url}/api/addresses/{id}"))
        .bearer_auth(&intruder)
        .json(&json!({ "label": "Hijacked" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .patch(format!("{base_url}/api/addresses/{id}/default"))
        .bearer_auth(&intruder)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .delete(format!("{base_url}/api/addresses/{id}"))
        .bearer_auth(&intruder)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Still intact for the owner.
    let resp = client
        .get(format!("{base_url}/api/addresses/{id}"))
        .bearer_auth(&owner)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_delete_returns_not_found_for_missing_address() {
    let client = Client::new();
    let token = signup(&client).await;
    let base_url = api_base_url();

    let resp = client
        .delete(format!("{base_url}/api/addresses/{}", Uuid::new_v4()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
