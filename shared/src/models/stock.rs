//! Stock ledger models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Product;

/// Running stock totals for one product
///
/// Invariants held after every mutation:
/// `remaining_stock == received_quantity - outgoing_quantity` and
/// `remaining_stock >= 0`. `reserved_quantity` is a soft hold tracked
/// alongside; it never changes `remaining_stock`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRecord {
    pub product_id: Uuid,
    pub received_quantity: i64,
    pub outgoing_quantity: i64,
    pub reserved_quantity: i64,
    pub remaining_stock: i64,
}

impl StockRecord {
    pub fn new(product_id: Uuid) -> Self {
        Self {
            product_id,
            received_quantity: 0,
            outgoing_quantity: 0,
            reserved_quantity: 0,
            remaining_stock: 0,
        }
    }

    /// Quantity free to allocate once active holds are taken into account
    pub fn available(&self) -> i64 {
        (self.remaining_stock - self.reserved_quantity).max(0)
    }
}

/// Stock record joined with its product, as shown on the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct StockView {
    #[serde(flatten)]
    pub product: Product,
    pub received_quantity: i64,
    pub outgoing_quantity: i64,
    pub reserved_quantity: i64,
    pub remaining_stock: i64,
    pub available: i64,
    /// Remaining stock valued at the current cost price
    pub stock_value: Decimal,
}

/// Input for receiving stock against a product
#[derive(Debug, Clone, Deserialize)]
pub struct ReceiveStockInput {
    pub quantity: i64,
    /// Valuation for this receipt; defaults to the product's cost price
    pub unit_cost: Option<Decimal>,
    pub date: Option<chrono::NaiveDate>,
    pub supplier: Option<String>,
    pub comments: Option<String>,
    pub user: Option<String>,
}

/// Dashboard aggregates over the whole warehouse
#[derive(Debug, Clone, Serialize)]
pub struct WarehouseSummary {
    pub total_products: i64,
    pub total_remaining: i64,
    pub total_reserved: i64,
    pub total_stock_value: Decimal,
    /// Products at or below the critical threshold
    pub critical_count: i64,
    /// Products at or below the low-stock threshold (critical included)
    pub low_count: i64,
}

/// Filters for the warehouse stock listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockFilter {
    /// Case-insensitive substring over article and name
    pub search: Option<String>,
    /// Only products at or below the critical threshold
    #[serde(default)]
    pub critical_only: bool,
}
