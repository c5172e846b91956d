//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Registration, login, tokens, password reset
//! - `addresses` - Address book with the single-default invariant
//! - `orders` - Order placement and stock accounting
//! - `email` - Transactional email (welcome, password reset)
//!
//! Products, suppliers, messaging, and notifications are thin enough that
//! their route handlers talk to [`crate::db`] directly.

pub mod addresses;
pub mod auth;
pub mod email;
pub mod orders;

pub use addresses::{AddressError, AddressService};
pub use auth::{AuthError, AuthService, TokenService};
pub use email::{EmailError, EmailService};
pub use orders::{OrderError, OrderService};
