//! CLI subcommand implementations.

pub mod migrate;
pub mod seed;
pub mod user;

use secrecy::SecretString;

/// Resolve the database URL the way the API does: `AKUBATA_DATABASE_URL`
/// first, `DATABASE_URL` as the fallback.
pub fn database_url() -> Result<SecretString, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    std::env::var("AKUBATA_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "AKUBATA_DATABASE_URL (or DATABASE_URL) not set".into())
}
