//! HTTP handlers for the warehouse dashboard endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use shared::models::{
    CreateProductInput, CreateProjectInput, HistoryEntry, ImportProductsInput, ImportReport,
    Product, Project, ReceiveStockInput, StockFilter, StockView, UpdateProductInput,
    WarehouseSummary,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::{CatalogService, StockService};
use crate::AppState;

/// List stock views for the dashboard table
pub async fn list_stock(
    State(state): State<AppState>,
    Query(filter): Query<StockFilter>,
) -> AppResult<Json<Vec<StockView>>> {
    let service = StockService::new(state.store);
    Ok(Json(service.list_stock(&filter)))
}

/// Warehouse-wide aggregates
pub async fn get_warehouse_summary(
    State(state): State<AppState>,
) -> AppResult<Json<WarehouseSummary>> {
    let service = StockService::new(state.store);
    Ok(Json(service.summary()))
}

/// Create a product (optionally with opening stock)
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> AppResult<Json<StockView>> {
    let service = CatalogService::new(state.store);
    let view = service.create_product(input)?;
    Ok(Json(view))
}

/// List catalog products
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let service = CatalogService::new(state.store);
    Ok(Json(service.list_products()))
}

/// Get one product with its stock record
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<StockView>> {
    let service = StockService::new(state.store);
    let view = service.get_stock(product_id)?;
    Ok(Json(view))
}

/// Update a product
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<Product>> {
    let service = CatalogService::new(state.store);
    let product = service.update_product(product_id, input)?;
    Ok(Json(product))
}

/// Book a stock receipt
pub async fn receive_stock(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(input): Json<ReceiveStockInput>,
) -> AppResult<Json<StockView>> {
    let service = StockService::new(state.store);
    let view = service.receive(product_id, input)?;
    Ok(Json(view))
}

/// Stock movement history for one product
pub async fn get_stock_movements(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    let service = StockService::new(state.store);
    let movements = service.get_movements(product_id)?;
    Ok(Json(movements))
}

/// Bulk import from the spreadsheet template
pub async fn import_products(
    State(state): State<AppState>,
    Json(input): Json<ImportProductsInput>,
) -> AppResult<Json<ImportReport>> {
    let service = CatalogService::new(state.store);
    let report = service.import_products(input)?;
    Ok(Json(report))
}

/// List projects
pub async fn list_projects(State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    let service = CatalogService::new(state.store);
    Ok(Json(service.list_projects()))
}

/// Create a project
pub async fn create_project(
    State(state): State<AppState>,
    Json(input): Json<CreateProjectInput>,
) -> AppResult<Json<Project>> {
    let service = CatalogService::new(state.store);
    let project = service.create_project(input)?;
    Ok(Json(project))
}
