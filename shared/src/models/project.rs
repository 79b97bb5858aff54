//! Project models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A project that expenses and reserves are booked against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    /// Short unique code (e.g., "OBA-P1")
    pub code: String,
}

/// Input for creating a project
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectInput {
    pub name: String,
    pub code: String,
}
