//! Domain types.
//!
//! Plain data records, separate from database row types and request DTOs.
//! Persistence lives in [`crate::db`]; these types carry no behavior beyond
//! construction and formatting helpers.

pub mod address;
pub mod message;
pub mod notification;
pub mod order;
pub mod product;
pub mod supplier;
pub mod user;

pub use address::{Address, AddressPatch, NewAddress};
pub use message::{Conversation, ConversationSummary, Message};
pub use notification::Notification;
pub use order::{Order, OrderItem, OrderItemRequest, OrderWithItems};
pub use product::{NewProduct, Product, ProductPatch};
pub use supplier::{NewSupplier, Supplier, SupplierPatch};
pub use user::User;
