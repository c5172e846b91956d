//! User roles for authorization checks.

use serde::{Deserialize, Serialize};

/// User role with different permission levels.
///
/// Stored as lowercase text in the database and carried in token claims.
/// Route handlers gate mutations on products, suppliers, and the full order
/// listing to `Admin`/`Manager`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(type_name = "user_role", rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, including destructive operations.
    Admin,
    /// Store management: products, suppliers, all orders.
    Manager,
    /// Operational access without management rights.
    Staff,
    /// Regular shopper account.
    #[default]
    Basic,
}

impl Role {
    /// Whether this role may manage catalog data (products, suppliers).
    #[must_use]
    pub const fn can_manage_catalog(self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Manager => write!(f, "manager"),
            Self::Staff => write!(f, "staff"),
            Self::Basic => write!(f, "basic"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "staff" => Ok(Self::Staff),
            "basic" => Ok(Self::Basic),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
