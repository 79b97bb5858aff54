//! Product catalog models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DuplicateHandling;

/// A catalog item identified by its article code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    /// Unique article code (e.g., "PNL-001"), immutable once created
    pub article: String,
    pub name: String,
    pub cost_price: Decimal,
    pub category: Option<String>,
    pub supplier: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a product
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductInput {
    pub article: String,
    pub name: String,
    pub cost_price: Decimal,
    pub category: Option<String>,
    pub supplier: Option<String>,
    /// Opening balance, booked as a stock receipt when positive
    pub initial_stock: Option<i64>,
}

/// Input for updating a product (article is immutable)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub cost_price: Option<Decimal>,
    pub category: Option<String>,
    pub supplier: Option<String>,
}

/// One row of the import template
///
/// Columns: Article, Name, Initial Stock, Cost Price, Category, Supplier.
/// Article and Name are required; the rest default to empty/zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRow {
    pub article: String,
    pub name: String,
    pub initial_stock: Option<i64>,
    pub cost_price: Option<Decimal>,
    pub category: Option<String>,
    pub supplier: Option<String>,
}

/// Input for a bulk product import
#[derive(Debug, Clone, Deserialize)]
pub struct ImportProductsInput {
    pub rows: Vec<ImportRow>,
    /// Overrides the configured duplicate-handling policy for this run
    pub duplicate_handling: Option<DuplicateHandling>,
}

/// Outcome of a bulk product import
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub imported: u32,
    pub updated: u32,
    pub skipped: u32,
    /// Articles left untouched under the `prompt` policy; the client is
    /// expected to resolve these and re-submit
    pub conflicts: Vec<String>,
    pub errors: Vec<ImportRowError>,
}

/// A rejected import row
#[derive(Debug, Clone, Serialize)]
pub struct ImportRowError {
    /// Zero-based row index in the submitted batch
    pub row: usize,
    pub field: String,
    pub message: String,
}
