//! HTTP handlers for the reserves management endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use shared::models::{CreateReserveInput, Reserve, ReserveFilter, ReserveStatus};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::ReserveService;
use crate::AppState;

/// Request body for a status transition
#[derive(Debug, Deserialize)]
pub struct SetReserveStatusInput {
    pub status: ReserveStatus,
}

/// List reserves, filtered
pub async fn list_reserves(
    State(state): State<AppState>,
    Query(filter): Query<ReserveFilter>,
) -> AppResult<Json<Vec<Reserve>>> {
    let service = ReserveService::new(state.store);
    Ok(Json(service.list(&filter)))
}

/// Create a reserve
pub async fn create_reserve(
    State(state): State<AppState>,
    Json(input): Json<CreateReserveInput>,
) -> AppResult<Json<Reserve>> {
    let service = ReserveService::new(state.store);
    let reserve = service.create(input)?;
    Ok(Json(reserve))
}

/// Get one reserve
pub async fn get_reserve(
    State(state): State<AppState>,
    Path(reserve_id): Path<Uuid>,
) -> AppResult<Json<Reserve>> {
    let service = ReserveService::new(state.store);
    let reserve = service.get(reserve_id)?;
    Ok(Json(reserve))
}

/// Replace a reserve wholesale
pub async fn update_reserve(
    State(state): State<AppState>,
    Path(reserve_id): Path<Uuid>,
    Json(input): Json<CreateReserveInput>,
) -> AppResult<Json<Reserve>> {
    let service = ReserveService::new(state.store);
    let reserve = service.update(reserve_id, input)?;
    Ok(Json(reserve))
}

/// Toggle a reserve between Active and Cancelled
pub async fn set_reserve_status(
    State(state): State<AppState>,
    Path(reserve_id): Path<Uuid>,
    Json(input): Json<SetReserveStatusInput>,
) -> AppResult<Json<Reserve>> {
    let service = ReserveService::new(state.store);
    let reserve = service.set_status(reserve_id, input.status)?;
    Ok(Json(reserve))
}

/// Delete a reserve
pub async fn delete_reserve(
    State(state): State<AppState>,
    Path(reserve_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = ReserveService::new(state.store);
    service.delete(reserve_id)?;
    Ok(Json(()))
}
