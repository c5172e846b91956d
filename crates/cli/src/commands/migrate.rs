//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! akubata-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `AKUBATA_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! Migration files live in `crates/api/migrations/`.

use akubata_api::db;

/// Run database migrations.
///
/// # Errors
///
/// Returns an error if the environment variable is missing, the connection
/// fails, or a migration fails to apply.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
