//! Integration tests for the Akubata API.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! docker compose up -d postgres
//! cargo run -p akubata-cli -- migrate
//!
//! # Start the API server
//! cargo run -p akubata-api
//!
//! # Run integration tests (ignored by default)
//! cargo test -p akubata-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `auth` - signup, login, token handling, password reset
//! - `addresses` - address book CRUD and the single-default invariant
//! - `orders` - order placement, stock accounting, role gating
//! - `messaging` - conversations, messages, notifications
//!
//! The base URL is read from `API_BASE_URL` and defaults to
//! `http://localhost:5001`. Tests create their own throwaway accounts
//! (unique email per run) and clean up the rows they can reach through
//! the API; leftover users are harmless in a disposable test database.
