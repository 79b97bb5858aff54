//! Inventory audit tests
//!
//! Covers the session state machine, variance computation, the
//! confirm-time write-back to the ledger and the summary aggregates.

use std::str::FromStr;

use rust_decimal::Decimal;
use shared::models::{AuditStatus, CreateProductInput, HistoryAction, StartAuditInput};
use uuid::Uuid;
use warehouse_ledger_backend::error::AppError;
use warehouse_ledger_backend::services::{AuditService, CatalogService};
use warehouse_ledger_backend::store::Store;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Store with two products: PNL-002 at 23 units, ACC-001 at 156
fn setup() -> (Store, Uuid, Uuid) {
    let store = Store::new();
    let catalog = CatalogService::new(store.clone());
    let first = catalog
        .create_product(CreateProductInput {
            article: "PNL-002".to_string(),
            name: "Acoustic Panel 1200x600mm".to_string(),
            cost_price: dec("89.75"),
            category: None,
            supplier: None,
            initial_stock: Some(23),
        })
        .unwrap();
    let second = catalog
        .create_product(CreateProductInput {
            article: "ACC-001".to_string(),
            name: "Mounting Bracket Set".to_string(),
            cost_price: dec("12.25"),
            category: None,
            supplier: None,
            initial_stock: Some(156),
        })
        .unwrap();
    (store, first.product.id, second.product.id)
}

#[test]
fn test_start_session_snapshots_stock() {
    let (store, _, _) = setup();
    let service = AuditService::new(store);

    let session = service.start_session(StartAuditInput::default()).unwrap();
    assert_eq!(session.status, AuditStatus::InProgress);
    assert_eq!(session.items.len(), 2);

    let item = &session.items[0];
    assert_eq!(item.article, "PNL-002");
    assert_eq!(item.system_stock, 23);
    assert_eq!(item.actual_stock, 23);
    assert_eq!(item.variance, 0);
    assert!(!item.verified);
}

#[test]
fn test_only_one_session_in_progress() {
    let (store, _, _) = setup();
    let service = AuditService::new(store);

    service.start_session(StartAuditInput::default()).unwrap();
    let err = service
        .start_session(StartAuditInput::default())
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidStateTransition(_)));
}

/// Counting 20 where the system records 23 yields a -3 variance
#[test]
fn test_set_actual_stock_recomputes_variance() {
    let (store, _, _) = setup();
    let service = AuditService::new(store);

    let session = service.start_session(StartAuditInput::default()).unwrap();
    let item_id = session.items[0].id;

    let item = service.set_actual_stock(session.id, item_id, 20).unwrap();
    assert_eq!(item.variance, -3);

    let summary = service.summary(session.id).unwrap();
    assert_eq!(summary.total_items, 2);
    assert_eq!(summary.total_variances, 1);
    assert_eq!(summary.negative_variances, 1);
    assert_eq!(summary.positive_variances, 0);
}

#[test]
fn test_set_actual_stock_rejects_negative_count() {
    let (store, _, _) = setup();
    let service = AuditService::new(store);

    let session = service.start_session(StartAuditInput::default()).unwrap();
    let item_id = session.items[0].id;

    let err = service
        .set_actual_stock(session.id, item_id, -1)
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "actual_stock"));
}

#[test]
fn test_mark_verified_is_a_checklist_flag() {
    let (store, _, _) = setup();
    let service = AuditService::new(store);

    let session = service.start_session(StartAuditInput::default()).unwrap();
    let ids: Vec<Uuid> = session.items.iter().map(|i| i.id).collect();

    let session = service.mark_verified(session.id, &ids[..1]).unwrap();
    assert!(session.items[0].verified);
    assert!(!session.items[1].verified);

    let summary = service.summary(session.id).unwrap();
    assert_eq!(summary.verified_items, 1);
}

#[test]
fn test_confirm_writes_counted_stock_back() {
    let (store, first_id, second_id) = setup();
    let service = AuditService::new(store.clone());

    let session = service.start_session(StartAuditInput::default()).unwrap();
    service
        .set_actual_stock(session.id, session.items[0].id, 20)
        .unwrap();
    service
        .set_actual_stock(session.id, session.items[1].id, 160)
        .unwrap();

    let history_len = store.read().history.len();
    let confirmed = service.confirm_inventory(session.id).unwrap();
    assert_eq!(confirmed.status, AuditStatus::Completed);
    assert!(confirmed.completed_at.is_some());

    let state = store.read();
    let first = state.stock(first_id).unwrap();
    let second = state.stock(second_id).unwrap();
    assert_eq!(first.remaining_stock, 20);
    assert_eq!(second.remaining_stock, 160);

    // Balance identity survives the write-back
    assert_eq!(
        first.remaining_stock,
        first.received_quantity - first.outgoing_quantity
    );
    assert_eq!(
        second.remaining_stock,
        second.received_quantity - second.outgoing_quantity
    );

    // One audit entry per changed item
    assert_eq!(state.history.len(), history_len + 2);
    let entry = state.history.last().unwrap();
    assert_eq!(entry.action, HistoryAction::Audit);
    assert!(entry.reference.starts_with("Audit #AUD-"));
}

#[test]
fn test_confirm_without_variances_writes_nothing() {
    let (store, first_id, _) = setup();
    let service = AuditService::new(store.clone());

    let session = service.start_session(StartAuditInput::default()).unwrap();
    let history_len = store.read().history.len();

    let confirmed = service.confirm_inventory(session.id).unwrap();
    assert_eq!(confirmed.status, AuditStatus::Completed);
    assert_eq!(store.read().history.len(), history_len);
    assert_eq!(store.read().stock(first_id).unwrap().remaining_stock, 23);
}

#[test]
fn test_completed_is_terminal() {
    let (store, _, _) = setup();
    let service = AuditService::new(store);

    let session = service.start_session(StartAuditInput::default()).unwrap();
    let item_id = session.items[0].id;
    service.confirm_inventory(session.id).unwrap();

    let err = service.confirm_inventory(session.id).unwrap_err();
    assert!(matches!(err, AppError::InvalidStateTransition(_)));

    let err = service
        .set_actual_stock(session.id, item_id, 10)
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidStateTransition(_)));

    let err = service.mark_verified(session.id, &[item_id]).unwrap_err();
    assert!(matches!(err, AppError::InvalidStateTransition(_)));
}

#[test]
fn test_session_listing_shows_totals() {
    let (store, _, _) = setup();
    let service = AuditService::new(store);

    let session = service.start_session(StartAuditInput {
        auditor_name: Some("Manager User".to_string()),
        audit_date: None,
    })
    .unwrap();
    service
        .set_actual_stock(session.id, session.items[0].id, 25)
        .unwrap();
    service.confirm_inventory(session.id).unwrap();

    let second = service.start_session(StartAuditInput::default()).unwrap();

    let sessions = service.list_sessions();
    assert_eq!(sessions.len(), 2);
    // Newest first
    assert_eq!(sessions[0].id, second.id);
    assert_eq!(sessions[1].auditor_name, "Manager User");
    assert_eq!(sessions[1].total_variances, 1);
    assert_eq!(sessions[1].status, AuditStatus::Completed);
}

#[test]
fn test_current_session_lookup() {
    let (store, _, _) = setup();
    let service = AuditService::new(store);

    let err = service.current_session().unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let session = service.start_session(StartAuditInput::default()).unwrap();
    assert_eq!(service.current_session().unwrap().id, session.id);

    service.confirm_inventory(session.id).unwrap();
    assert!(service.current_session().is_err());
}
