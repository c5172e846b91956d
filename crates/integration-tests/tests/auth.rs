//! Integration tests for signup, login, and token handling.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//!   (cargo run -p akubata-cli -- migrate)
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

/// Unique throwaway email per test run.
fn test_email() -> String {
    format!("it-{}@example.test", Uuid::new_v4().simple())
}

/// Test helper: sign up a fresh account, returning (email, bearer token).
async fn signup(client: &Client, password: &str) -> (String, String) {
    let base_url = api_base_url();
    let email = test_email();
    let resp = client
        .post(format!("{base_url}/api/auth/signup"))
        .json(&json!({
            "first_name": "Test",
            "last_name": "User",
            "email": email,
            "password": password,
            "confirm_password": password,
        }))
        .send()
        .await
        .expect("Failed to sign up test user");

    assert_eq!(resp.status(), StatusCode::OK, "signup should succeed");
    let body: Value = resp.json().await.expect("Failed to parse signup response");
    let token = body["token"].as_str().expect("signup returns a token").to_string();
    (email, token)
}

// ============================================================================
// Signup & Login Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_signup_returns_token_and_basic_role() {
    let client = Client::new();
    let base_url = api_base_url();
    let (email, token) = signup(&client, "correct horse battery").await;

    let resp = client
        .get(format!("{base_url}/api/auth/me"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch profile");

    assert_eq!(resp.status(), StatusCode::OK);
    let me: Value = resp.json().await.expect("Failed to parse profile");
    assert_eq!(me["email"], email.as_str());
    assert_eq!(me["role"], "basic");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_signup_rejects_duplicate_email() {
    let client = Client::new();
    let base_url = api_base_url();
    let (email, _token) = signup(&client, "correct horse battery").await;

    let resp = client
        .post(format!("{base_url}/api/auth/signup"))
        .json(&json!({
            "first_name": "Test",
            "last_name": "User",
            "email": email,
            "password": "correct horse battery",
            "confirm_password": "correct horse battery",
        }))
        .send()
        .await
        .expect("Failed to send duplicate signup");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_signup_rejects_short_password() {
    let client = Client::new();
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/api/auth/signup"))
        .json(&json!({
            "first_name": "Test",
            "last_name": "User",
            "email": test_email(),
            "password": "short",
            "confirm_password": "short",
        }))
        .send()
        .await
        .expect("Failed to send signup");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_login_with_wrong_password_is_unauthorized() {
    let client = Client::new();
    let base_url = api_base_url();
    let (email, _token) = signup(&client, "correct horse battery").await;

    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "email": email, "password": "wrong password" }))
        .send()
        .await
        .expect("Failed to send login");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_login_returns_default_address_summary() {
    let client = Client::new();
    let base_url = api_base_url();
    let password = "correct horse battery";
    let (email, token) = signup(&client, password).await;

    // No addresses yet: login omits default_address.
    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse login response");
    assert!(body.get("default_address").is_none());

    // Add a default address, log in again.
    let resp = client
        .post(format!("{base_url}/api/addresses"))
        .bearer_auth(&token)
        .json(&json!({
            "recipient_first_name": "Test",
            "phone_number": "+1 555 0100",
            "address_line1": "12 Pier Road",
            "city": "Portsmouth",
            "state": "NH",
            "zip_code": "03801",
            "country": "US",
            "is_default": true,
        }))
        .send()
        .await
        .expect("Failed to create address");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in");
    let body: Value = resp.json().await.expect("Failed to parse login response");
    let summary = body["default_address"].as_str().expect("default_address present");
    assert!(summary.contains("12 Pier Road"));
}

// ============================================================================
// Token Handling Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_missing_token_is_unauthorized() {
    let client = Client::new();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/api/auth/me"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_garbage_token_is_unauthorized() {
    let client = Client::new();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/api/auth/me"))
        .bearer_auth("not.a.token")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Password Management Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_change_password_invalidates_old_credentials() {
    let client = Client::new();
    let base_url = api_base_url();
    let old_password = "correct horse battery";
    let new_password = "staple gun overture";
    let (email, token) = signup(&client, old_password).await;

    let resp = client
        .post(format!("{base_url}/api/auth/change-password"))
        .bearer_auth(&token)
        .json(&json!({
            "current_password": old_password,
            "new_password": new_password,
            "confirm_password": new_password,
        }))
        .send()
        .await
        .expect("Failed to change password");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "email": email, "password": old_password }))
        .send()
        .await
        .expect("Failed to send login");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "email": email, "password": new_password }))
        .send()
        .await
        .expect("Failed to send login");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_forgot_password_does_not_reveal_registration() {
    let client = Client::new();
    let base_url = api_base_url();
    let (email, _token) = signup(&client, "correct horse battery").await;

    let known = client
        .post(format!("{base_url}/api/auth/forgot-password"))
        .json(&json!({ "email": email }))
        .send()
        .await
        .expect("Failed to send forgot-password");
    let unknown = client
        .post(format!("{base_url}/api/auth/forgot-password"))
        .json(&json!({ "email": test_email() }))
        .send()
        .await
        .expect("Failed to send forgot-password");

    assert_eq!(known.status(), StatusCode::OK);
    assert_eq!(unknown.status(), StatusCode::OK);
    let known_body: Value = known.json().await.expect("parse");
    let unknown_body: Value = unknown.json().await.expect("parse");
    assert_eq!(known_body["message"], unknown_body["message"]);
}
