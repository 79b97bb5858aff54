//! WebAssembly module for the Warehouse Ledger dashboard
//!
//! Provides client-side computation for:
//! - Expense cost calculations
//! - Audit variance calculations
//! - Stock availability figures
//! - Offline form validation

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Calculate an expense total from quantity and unit cost
#[wasm_bindgen]
pub fn calculate_total_cost(quantity: i64, unit_cost: f64) -> f64 {
    let unit_cost = Decimal::try_from(unit_cost).unwrap_or(Decimal::ZERO);
    let total = unit_cost * Decimal::from(quantity);
    total.to_string().parse().unwrap_or(0.0)
}

/// Calculate an audit variance (actual minus system stock)
#[wasm_bindgen]
pub fn calculate_variance(actual_stock: i64, system_stock: i64) -> i64 {
    actual_stock - system_stock
}

/// Quantity free to allocate once active holds are taken into account
#[wasm_bindgen]
pub fn calculate_available(remaining_stock: i64, reserved_quantity: i64) -> i64 {
    (remaining_stock - reserved_quantity).max(0)
}

/// Validate an article code for the add-product form
#[wasm_bindgen]
pub fn is_valid_article_code(code: &str) -> bool {
    validate_article_code(code).is_ok()
}

/// Check whether an allocation quantity fits the remaining stock
#[wasm_bindgen]
pub fn can_allocate(quantity: i64, remaining_stock: i64) -> bool {
    quantity > 0 && quantity <= remaining_stock
}

/// Check whether a remaining-stock figure counts as critical
#[wasm_bindgen]
pub fn is_critical(remaining_stock: i64, critical_threshold: i64) -> bool {
    is_critical_stock(remaining_stock, critical_threshold)
}

/// Validate a counted stock figure for the audit form
#[wasm_bindgen]
pub fn is_valid_counted_stock(value: i64) -> bool {
    validate_counted_stock(value).is_ok()
}

/// Compute audit summary counts from a JSON array of audit items
#[wasm_bindgen]
pub fn summarize_audit_items(items_json: &str) -> Result<String, JsValue> {
    let items: Vec<AuditItem> = serde_json::from_str(items_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid items JSON: {}", e)))?;

    let summary = serde_json::json!({
        "total_items": items.len(),
        "total_variances": items.iter().filter(|i| i.variance != 0).count(),
        "positive_variances": items.iter().filter(|i| i.variance > 0).count(),
        "negative_variances": items.iter().filter(|i| i.variance < 0).count(),
        "verified_items": items.iter().filter(|i| i.verified).count(),
    });
    Ok(summary.to_string())
}
