//! Address domain types.
//!
//! At most one address per user carries `is_default = true` at any committed
//! state. The repository layer maintains that invariant transactionally; see
//! [`crate::db::addresses`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use akubata_core::{AddressId, UserId};

/// A saved shipping/billing address.
#[derive(Debug, Clone, Serialize)]
pub struct Address {
    /// Unique address ID.
    pub id: AddressId,
    /// Owning user.
    pub user_id: UserId,
    /// Optional user-assigned label (e.g., "Home", "Office").
    pub label: Option<String>,
    /// Recipient given name.
    pub recipient_first_name: String,
    /// Recipient family name.
    pub recipient_last_name: Option<String>,
    /// Contact phone for delivery.
    pub phone_number: String,
    /// Street address, first line.
    pub address_line1: String,
    /// Street address, second line.
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    /// Whether this is the owner's default address.
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Address {
    /// One-line summary for email payloads and login responses.
    #[must_use]
    pub fn summary(&self) -> String {
        [
            Some(self.address_line1.as_str()),
            self.address_line2.as_deref(),
            Some(self.city.as_str()),
            Some(self.state.as_str()),
            Some(self.zip_code.as_str()),
            Some(self.country.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Fields for creating an address.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAddress {
    pub label: Option<String>,
    pub recipient_first_name: String,
    pub recipient_last_name: Option<String>,
    pub phone_number: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    /// When true, any existing default for the owner is cleared first.
    #[serde(default)]
    pub is_default: bool,
}

/// Partial update for an address. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressPatch {
    pub label: Option<String>,
    pub recipient_first_name: Option<String>,
    pub recipient_last_name: Option<String>,
    pub phone_number: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    /// `Some(true)` steals the default from any sibling address.
    pub is_default: Option<bool>,
}

impl AddressPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.recipient_first_name.is_none()
            && self.recipient_last_name.is_none()
            && self.phone_number.is_none()
            && self.address_line1.is_none()
            && self.address_line2.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.zip_code.is_none()
            && self.country.is_none()
            && self.is_default.is_none()
    }
}
