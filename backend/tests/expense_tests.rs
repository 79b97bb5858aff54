//! Expense allocation tests
//!
//! Covers allocation against projects, the stock-difference rule on
//! update, restore-on-delete and the read-side filters.

use std::str::FromStr;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::models::{
    CreateExpenseInput, CreateProductInput, CreateProjectInput, ExpenseFilter, HistoryAction,
    UpdateExpenseInput,
};
use uuid::Uuid;
use warehouse_ledger_backend::error::AppError;
use warehouse_ledger_backend::services::{CatalogService, ExpenseService};
use warehouse_ledger_backend::store::Store;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::from_str(s).unwrap()
}

/// Store with one product ("PNL-001") and one project
fn setup(initial_stock: i64) -> (Store, Uuid, Uuid) {
    let store = Store::new();
    let catalog = CatalogService::new(store.clone());
    let view = catalog
        .create_product(CreateProductInput {
            article: "PNL-001".to_string(),
            name: "Standard Wall Panel 2400x1200".to_string(),
            cost_price: dec("125.50"),
            category: Some("Wall Panels".to_string()),
            supplier: None,
            initial_stock: Some(initial_stock),
        })
        .unwrap();
    let project = catalog
        .create_project(CreateProjectInput {
            name: "Office Building A - Phase 1".to_string(),
            code: "OBA-P1".to_string(),
        })
        .unwrap();
    (store, view.product.id, project.id)
}

fn expense_input(product_id: Uuid, project_id: Uuid, quantity: i64) -> CreateExpenseInput {
    CreateExpenseInput {
        product_id,
        project_id,
        quantity,
        date: Some(date("2024-01-15")),
        user: None,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

/// Allocating 15 of a 45-unit product at 125.50
#[test]
fn test_create_expense_decrements_stock() {
    let (store, product_id, project_id) = setup(45);
    let service = ExpenseService::new(store.clone());

    let expense = service
        .create(expense_input(product_id, project_id, 15))
        .unwrap();

    assert_eq!(expense.quantity, 15);
    assert_eq!(expense.unit_cost, dec("125.50"));
    assert_eq!(expense.total_cost, dec("1882.50"));
    assert_eq!(expense.project_name, "Office Building A - Phase 1");

    let state = store.read();
    assert_eq!(state.stock(product_id).unwrap().remaining_stock, 30);

    let entry = state.history.last().unwrap();
    assert_eq!(entry.action, HistoryAction::Outgoing);
    assert_eq!(entry.quantity_change, -15);
    assert_eq!(entry.quantity_before, 45);
    assert_eq!(entry.quantity_after, 30);
    assert_eq!(entry.project.as_deref(), Some("Office Building A - Phase 1"));
    assert!(entry.reference.starts_with("Expense #EXP-"));
}

/// Requesting 50 with 45 available fails and changes nothing
#[test]
fn test_create_expense_insufficient_stock() {
    let (store, product_id, project_id) = setup(45);
    let service = ExpenseService::new(store.clone());
    let history_len = store.read().history.len();

    let err = service
        .create(expense_input(product_id, project_id, 50))
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InsufficientStock {
            available: 45,
            requested: 50
        }
    ));

    let state = store.read();
    assert_eq!(state.stock(product_id).unwrap().remaining_stock, 45);
    assert!(state.expenses.is_empty());
    assert_eq!(state.history.len(), history_len);
}

#[test]
fn test_create_expense_requires_project_date_and_quantity() {
    let (store, product_id, project_id) = setup(45);
    let service = ExpenseService::new(store);

    let err = service
        .create(CreateExpenseInput {
            product_id,
            project_id: Uuid::new_v4(),
            quantity: 5,
            date: Some(date("2024-01-15")),
            user: None,
        })
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "project"));

    let err = service
        .create(CreateExpenseInput {
            product_id,
            project_id,
            quantity: 5,
            date: None,
            user: None,
        })
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "date"));

    let err = service
        .create(expense_input(product_id, project_id, 0))
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "quantity"));
}

/// Raising the quantity from 8 to 20 takes the 12-unit difference
#[test]
fn test_update_expense_applies_stock_difference() {
    let (store, product_id, project_id) = setup(38);
    let service = ExpenseService::new(store.clone());

    let expense = service
        .create(expense_input(product_id, project_id, 8))
        .unwrap();
    assert_eq!(store.read().stock(product_id).unwrap().remaining_stock, 30);

    let updated = service
        .update(
            expense.id,
            UpdateExpenseInput {
                quantity: Some(20),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(updated.quantity, 20);
    assert_eq!(updated.total_cost, dec("125.50") * Decimal::from(20));
    assert_eq!(store.read().stock(product_id).unwrap().remaining_stock, 18);
}

#[test]
fn test_update_expense_rejects_difference_beyond_stock() {
    let (store, product_id, project_id) = setup(20);
    let service = ExpenseService::new(store.clone());

    let expense = service
        .create(expense_input(product_id, project_id, 8))
        .unwrap();
    // remaining is now 12; a rise of 13 cannot be covered
    let err = service
        .update(
            expense.id,
            UpdateExpenseInput {
                quantity: Some(21),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InsufficientStock {
            available: 12,
            requested: 13
        }
    ));
    assert_eq!(store.read().stock(product_id).unwrap().remaining_stock, 12);
    assert_eq!(service.get(expense.id).unwrap().quantity, 8);
}

/// Deleting a 12-unit expense at 18 remaining restores 30
#[test]
fn test_delete_expense_restores_stock() {
    let (store, product_id, project_id) = setup(30);
    let service = ExpenseService::new(store.clone());

    let expense = service
        .create(expense_input(product_id, project_id, 12))
        .unwrap();
    assert_eq!(store.read().stock(product_id).unwrap().remaining_stock, 18);

    service.delete(expense.id, None).unwrap();

    let state = store.read();
    assert_eq!(state.stock(product_id).unwrap().remaining_stock, 30);
    assert!(state.expenses.is_empty());
    assert_eq!(state.history.last().unwrap().quantity_change, 12);
}

#[test]
fn test_expense_filters() {
    let (store, product_id, project_id) = setup(100);
    let catalog = CatalogService::new(store.clone());
    let other_project = catalog
        .create_project(CreateProjectInput {
            name: "Warehouse Expansion".to_string(),
            code: "WH-EXP".to_string(),
        })
        .unwrap();
    let service = ExpenseService::new(store);

    service
        .create(CreateExpenseInput {
            product_id,
            project_id,
            quantity: 10,
            date: Some(date("2024-01-15")),
            user: None,
        })
        .unwrap();
    service
        .create(CreateExpenseInput {
            product_id,
            project_id: other_project.id,
            quantity: 5,
            date: Some(date("2024-01-18")),
            user: None,
        })
        .unwrap();

    // Newest date first
    let all = service.list(&ExpenseFilter::default());
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].date, date("2024-01-18"));

    let by_project = service.list(&ExpenseFilter {
        project_id: Some(project_id),
        ..Default::default()
    });
    assert_eq!(by_project.len(), 1);
    assert_eq!(by_project[0].quantity, 10);

    let by_search = service.list(&ExpenseFilter {
        search: Some("expansion".to_string()),
        ..Default::default()
    });
    assert_eq!(by_search.len(), 1);
    assert_eq!(by_search[0].project_name, "Warehouse Expansion");

    let by_range = service.list(&ExpenseFilter {
        date_from: Some(date("2024-01-16")),
        date_to: Some(date("2024-01-31")),
        ..Default::default()
    });
    assert_eq!(by_range.len(), 1);

    let summary = service.summary(&ExpenseFilter::default());
    assert_eq!(summary.record_count, 2);
    assert_eq!(summary.items_allocated, 15);
    assert_eq!(summary.total_value, dec("125.50") * Decimal::from(15));
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Editing quantity a -> b -> a leaves remaining stock unchanged
    #[test]
    fn prop_update_roundtrip_preserves_stock(
        initial in 50i64..200,
        a in 1i64..25,
        b in 1i64..25
    ) {
        let (store, product_id, project_id) = setup(initial);
        let service = ExpenseService::new(store.clone());

        let expense = service
            .create(expense_input(product_id, project_id, a))
            .unwrap();
        let remaining_after_create = store.read().stock(product_id).unwrap().remaining_stock;

        service
            .update(expense.id, UpdateExpenseInput { quantity: Some(b), ..Default::default() })
            .unwrap();
        service
            .update(expense.id, UpdateExpenseInput { quantity: Some(a), ..Default::default() })
            .unwrap();

        let state = store.read();
        let record = state.stock(product_id).unwrap();
        prop_assert_eq!(record.remaining_stock, remaining_after_create);
        prop_assert_eq!(
            record.remaining_stock,
            record.received_quantity - record.outgoing_quantity
        );
    }

    /// Create followed by delete restores the record exactly
    #[test]
    fn prop_create_delete_roundtrip(
        initial in 1i64..200,
        quantity in 1i64..200
    ) {
        let (store, product_id, project_id) = setup(initial);
        let service = ExpenseService::new(store.clone());
        let before = store.read().stock(product_id).unwrap().clone();

        match service.create(expense_input(product_id, project_id, quantity)) {
            Ok(expense) => {
                prop_assert!(quantity <= initial);
                service.delete(expense.id, None).unwrap();
            }
            Err(err) => {
                let is_insufficient = matches!(err, AppError::InsufficientStock { .. });
                prop_assert!(is_insufficient);
                prop_assert!(quantity > initial);
            }
        }

        let after = store.read().stock(product_id).unwrap().clone();
        prop_assert_eq!(before.remaining_stock, after.remaining_stock);
        prop_assert_eq!(before.outgoing_quantity, after.outgoing_quantity);
    }
}
