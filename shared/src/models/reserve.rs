//! Reserve (soft hold) models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a reserve
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReserveStatus {
    Active,
    Cancelled,
}

impl std::fmt::Display for ReserveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReserveStatus::Active => write!(f, "Active"),
            ReserveStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// One reserved line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveItem {
    pub id: Uuid,
    pub article: String,
    pub product_name: String,
    pub reserved_quantity: i64,
    pub comments: Option<String>,
}

/// A named, project-scoped soft hold against future allocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reserve {
    pub id: Uuid,
    pub project_name: String,
    pub reservation_date: NaiveDate,
    pub status: ReserveStatus,
    pub items: Vec<ReserveItem>,
    pub total_items: i64,
    pub total_quantity: i64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Line item input for creating or replacing a reserve
#[derive(Debug, Clone, Deserialize)]
pub struct ReserveItemInput {
    pub article: String,
    pub product_name: String,
    pub reserved_quantity: i64,
    pub comments: Option<String>,
}

/// Input for creating a reserve (also used for whole-reserve replacement)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReserveInput {
    pub project_name: String,
    pub reservation_date: NaiveDate,
    pub items: Vec<ReserveItemInput>,
    pub created_by: Option<String>,
}

/// Read-side filters for the reserve listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReserveFilter {
    pub project: Option<String>,
    pub status: Option<ReserveStatus>,
    /// Case-insensitive substring over project name, article and product name
    pub search: Option<String>,
}
