//! Inventory audit models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of an audit session; `Completed` is terminal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    InProgress,
    Completed,
}

impl std::fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditStatus::InProgress => write!(f, "In Progress"),
            AuditStatus::Completed => write!(f, "Completed"),
        }
    }
}

/// One counted line of an audit session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditItem {
    pub id: Uuid,
    pub article: String,
    pub product_name: String,
    /// System-recorded stock at session start
    pub system_stock: i64,
    /// Physically counted stock, defaults to `system_stock`
    pub actual_stock: i64,
    /// `actual_stock - system_stock`
    pub variance: i64,
    pub verified: bool,
    /// Cost price snapshot, used to value the variance
    pub cost_price: Decimal,
}

/// A physical inventory count session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSession {
    pub id: Uuid,
    pub audit_date: NaiveDate,
    pub auditor_name: String,
    pub status: AuditStatus,
    pub items: Vec<AuditItem>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Input for starting an audit session
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartAuditInput {
    pub auditor_name: Option<String>,
    pub audit_date: Option<NaiveDate>,
}

/// Aggregate counts over one session's items
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AuditSummary {
    pub total_items: i64,
    /// Items with `variance != 0`
    pub total_variances: i64,
    pub positive_variances: i64,
    pub negative_variances: i64,
    pub verified_items: i64,
}

/// One row of the audit history listing
#[derive(Debug, Clone, Serialize)]
pub struct AuditSessionOverview {
    pub id: Uuid,
    pub audit_date: NaiveDate,
    pub auditor_name: String,
    pub status: AuditStatus,
    pub total_items: i64,
    pub total_variances: i64,
    pub created_at: DateTime<Utc>,
}
