//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use akubata_core::{OrderId, OrderItemId, OrderStatus, PaymentMethod, ProductId, UserId};

/// A customer order.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub order_status: OrderStatus,
    pub payment_method: PaymentMethod,
    /// Sum of `quantity * price` over the order's items.
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line item within an order.
///
/// `price` is the unit price captured at order time; later product price
/// changes do not affect existing orders.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
    /// Product name at read time, joined for display.
    pub product_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An order with its line items, as returned by detail endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// A requested line item when placing an order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub quantity: i32,
}
