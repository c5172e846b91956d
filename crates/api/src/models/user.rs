//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use akubata_core::{Email, Role, UserId};

/// A registered user.
///
/// The password hash and reset-token fields never leave the database layer;
/// this type is safe to serialize into API responses.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address (unique, lowercase).
    pub email: Email,
    /// Phone number, if provided.
    pub phone_number: Option<String>,
    /// Authorization role.
    pub role: Role,
    /// Whether the account is active (email verified / not disabled).
    pub is_active: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Full display name.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
