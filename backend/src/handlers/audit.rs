//! HTTP handlers for the inventory audit endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use shared::models::{
    AuditItem, AuditSession, AuditSessionOverview, AuditSummary, StartAuditInput,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::AuditService;
use crate::AppState;

/// Request body for recording a counted quantity
#[derive(Debug, Deserialize)]
pub struct SetActualStockInput {
    pub actual_stock: i64,
}

/// Request body for flagging items as verified
#[derive(Debug, Deserialize)]
pub struct MarkVerifiedInput {
    pub item_ids: Vec<Uuid>,
}

/// Start an audit session
pub async fn start_audit(
    State(state): State<AppState>,
    Json(input): Json<StartAuditInput>,
) -> AppResult<Json<AuditSession>> {
    let service = AuditService::new(state.store);
    let session = service.start_session(input)?;
    Ok(Json(session))
}

/// List past and current audit sessions
pub async fn list_audits(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<AuditSessionOverview>>> {
    let service = AuditService::new(state.store);
    Ok(Json(service.list_sessions()))
}

/// The session currently in progress
pub async fn get_current_audit(State(state): State<AppState>) -> AppResult<Json<AuditSession>> {
    let service = AuditService::new(state.store);
    let session = service.current_session()?;
    Ok(Json(session))
}

/// Get one audit session
pub async fn get_audit(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<AuditSession>> {
    let service = AuditService::new(state.store);
    let session = service.get_session(session_id)?;
    Ok(Json(session))
}

/// Record a counted quantity for one item
pub async fn set_actual_stock(
    State(state): State<AppState>,
    Path((session_id, item_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<SetActualStockInput>,
) -> AppResult<Json<AuditItem>> {
    let service = AuditService::new(state.store);
    let item = service.set_actual_stock(session_id, item_id, input.actual_stock)?;
    Ok(Json(item))
}

/// Flag selected items as physically verified
pub async fn mark_verified(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(input): Json<MarkVerifiedInput>,
) -> AppResult<Json<AuditSession>> {
    let service = AuditService::new(state.store);
    let session = service.mark_verified(session_id, &input.item_ids)?;
    Ok(Json(session))
}

/// Complete the session and write counted stock back to the ledger
pub async fn confirm_inventory(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<AuditSession>> {
    let service = AuditService::new(state.store);
    let session = service.confirm_inventory(session_id)?;
    Ok(Json(session))
}

/// Aggregate counts for one session
pub async fn get_audit_summary(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<AuditSummary>> {
    let service = AuditService::new(state.store);
    let summary = service.summary(session_id)?;
    Ok(Json(summary))
}
