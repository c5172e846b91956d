//! Product domain type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use akubata_core::{ProductId, SupplierId};

/// A catalog product.
///
/// `stock_quantity` is decremented when orders are placed and restored when
/// orders are deleted; both happen inside the order transaction.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub product_name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    /// Price per unit in the store currency.
    pub unit_price: Decimal,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    pub supplier_id: Option<SupplierId>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for adding a product to the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub product_name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub unit_price: Decimal,
    #[serde(default)]
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    pub supplier_id: Option<SupplierId>,
}

/// Partial update for a product. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub unit_price: Option<Decimal>,
    pub stock_quantity: Option<i32>,
    pub image_url: Option<String>,
    pub supplier_id: Option<SupplierId>,
    pub is_active: Option<bool>,
}
