//! Database operations for the Akubata `PostgreSQL` store.
//!
//! # Tables
//!
//! - `users` - Accounts, credentials, reset tokens
//! - `addresses` - Shipping/billing addresses (single default per user)
//! - `suppliers` / `products` - Catalog
//! - `orders` / `order_items` - Sales
//! - `conversations` / `conversation_participants` / `messages` - Messaging
//! - `notifications` - In-app notifications
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p akubata-cli -- migrate
//! ```
//!
//! Each repository holds a `&PgPool` and maps rows into the plain domain
//! records in [`crate::models`]. Queries use the runtime `sqlx` API with
//! `FromRow` row structs local to each repository module.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod addresses;
pub mod conversations;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod suppliers;
pub mod users;

pub use addresses::AddressRepository;
pub use conversations::ConversationRepository;
pub use notifications::NotificationRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use suppliers::SupplierRepository;
pub use users::UserRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email, duplicate address).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// An order asked for more units than a product has in stock.
    #[error("insufficient stock for {product_name}")]
    InsufficientStock {
        /// Name of the product that ran short.
        product_name: String,
    },
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Name of the unique constraint a violation fired, if the error is one.
fn violated_constraint(e: &sqlx::Error) -> Option<&str> {
    if let sqlx::Error::Database(db_err) = e
        && db_err.is_unique_violation()
    {
        return db_err.constraint();
    }
    None
}

/// Map a sqlx error, converting unique violations into `Conflict`.
fn conflict_on_unique(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}
