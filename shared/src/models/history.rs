//! History journal models

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of ledger mutation a history entry records
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    Received,
    Outgoing,
    Reserved,
    Audit,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::Received => "received",
            HistoryAction::Outgoing => "outgoing",
            HistoryAction::Reserved => "reserved",
            HistoryAction::Audit => "audit",
        }
    }
}

/// Immutable record of one ledger mutation; never updated or deleted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub action: HistoryAction,
    pub article: String,
    pub product_name: String,
    pub quantity_before: i64,
    pub quantity_after: i64,
    pub quantity_change: i64,
    /// Set on `reserved` entries, which leave remaining stock unchanged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_quantity: Option<i64>,
    pub cost: Decimal,
    pub total_cost: Decimal,
    pub user: String,
    pub project: Option<String>,
    /// Human-readable reference, e.g. "Expense #EXP-2024-0001"
    pub reference: String,
    pub comments: Option<String>,
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}

/// Project filter sentinel meaning "entries without a project"
pub const NO_PROJECT_SENTINEL: &str = "no-project";

/// Read-side filters for the history journal
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Case-insensitive substring over article and product name
    pub search: Option<String>,
    pub action: Option<HistoryAction>,
    pub user: Option<String>,
    /// Project name, or [`NO_PROJECT_SENTINEL`] for entries with none
    pub project: Option<String>,
}

/// Per-action entry counts for the journal header
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ActionStats {
    pub received: i64,
    pub outgoing: i64,
    pub reserved: i64,
    pub audit: i64,
}

/// Generate a document reference number, e.g. "EXP-2024-0001"
pub fn generate_reference(prefix: &str, year: i32, sequence: u32) -> String {
    format!("{}-{}-{:04}", prefix, year, sequence)
}
