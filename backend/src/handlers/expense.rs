//! HTTP handlers for the expense tracking endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use shared::models::{
    CreateExpenseInput, Expense, ExpenseFilter, ExpenseSummary, UpdateExpenseInput,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::ExpenseService;
use crate::AppState;

/// List expenses, filtered and newest first
pub async fn list_expenses(
    State(state): State<AppState>,
    Query(filter): Query<ExpenseFilter>,
) -> AppResult<Json<Vec<Expense>>> {
    let service = ExpenseService::new(state.store);
    Ok(Json(service.list(&filter)))
}

/// Aggregates over the filtered listing
pub async fn get_expense_summary(
    State(state): State<AppState>,
    Query(filter): Query<ExpenseFilter>,
) -> AppResult<Json<ExpenseSummary>> {
    let service = ExpenseService::new(state.store);
    Ok(Json(service.summary(&filter)))
}

/// Allocate stock to a project
pub async fn create_expense(
    State(state): State<AppState>,
    Json(input): Json<CreateExpenseInput>,
) -> AppResult<Json<Expense>> {
    let service = ExpenseService::new(state.store);
    let expense = service.create(input)?;
    Ok(Json(expense))
}

/// Get one expense
pub async fn get_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<Uuid>,
) -> AppResult<Json<Expense>> {
    let service = ExpenseService::new(state.store);
    let expense = service.get(expense_id)?;
    Ok(Json(expense))
}

/// Update an expense, applying the stock difference
pub async fn update_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<Uuid>,
    Json(input): Json<UpdateExpenseInput>,
) -> AppResult<Json<Expense>> {
    let service = ExpenseService::new(state.store);
    let expense = service.update(expense_id, input)?;
    Ok(Json(expense))
}

/// Delete an expense and restore its stock
pub async fn delete_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = ExpenseService::new(state.store);
    service.delete(expense_id, None)?;
    Ok(Json(()))
}
