//! Expense (project allocation) models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An outgoing stock movement booked against a project
///
/// Product and project identity are denormalized at creation time so the
/// record stays readable even if the catalog changes later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub project_id: Uuid,
    pub project_name: String,
    pub article: String,
    pub product_name: String,
    pub quantity: i64,
    /// Cost price snapshot at allocation time
    pub unit_cost: Decimal,
    pub total_cost: Decimal,
    pub date: NaiveDate,
    /// Document reference number, e.g. "EXP-2024-0001"
    pub reference: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an expense
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExpenseInput {
    pub product_id: Uuid,
    pub project_id: Uuid,
    pub quantity: i64,
    pub date: Option<NaiveDate>,
    pub user: Option<String>,
}

/// Input for updating an expense
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateExpenseInput {
    pub project_id: Option<Uuid>,
    pub quantity: Option<i64>,
    pub date: Option<NaiveDate>,
    pub user: Option<String>,
}

/// Read-side filters for the expense listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseFilter {
    /// Case-insensitive substring over article, product name and project name
    pub search: Option<String>,
    pub project_id: Option<Uuid>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Aggregates over the filtered expense listing
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseSummary {
    pub total_value: Decimal,
    pub items_allocated: i64,
    pub record_count: i64,
}
