//! Route definitions for the Warehouse Ledger Service
//!
//! One route group per dashboard screen, all views over the same ledger.

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Warehouse dashboard
        .nest("/warehouse", warehouse_routes())
        // Expenses tracking
        .nest("/expenses", expense_routes())
        // Reserves management
        .nest("/reserves", reserve_routes())
        // Inventory audit
        .nest("/audits", audit_routes())
        // History journal
        .nest("/history", history_routes())
        // Settings
        .nest("/settings", settings_routes())
}

/// Warehouse dashboard routes
fn warehouse_routes() -> Router<AppState> {
    Router::new()
        .route("/stock", get(handlers::list_stock))
        .route("/summary", get(handlers::get_warehouse_summary))
        .route(
            "/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/products/:product_id",
            get(handlers::get_product).put(handlers::update_product),
        )
        .route("/products/:product_id/receive", post(handlers::receive_stock))
        .route(
            "/products/:product_id/movements",
            get(handlers::get_stock_movements),
        )
        .route("/import", post(handlers::import_products))
        .route(
            "/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
}

/// Expense tracking routes
fn expense_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route("/summary", get(handlers::get_expense_summary))
        .route(
            "/:expense_id",
            get(handlers::get_expense)
                .put(handlers::update_expense)
                .delete(handlers::delete_expense),
        )
}

/// Reserve management routes
fn reserve_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_reserves).post(handlers::create_reserve),
        )
        .route(
            "/:reserve_id",
            get(handlers::get_reserve)
                .put(handlers::update_reserve)
                .delete(handlers::delete_reserve),
        )
        .route("/:reserve_id/status", put(handlers::set_reserve_status))
}

/// Inventory audit routes
fn audit_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_audits).post(handlers::start_audit))
        .route("/current", get(handlers::get_current_audit))
        .route("/:session_id", get(handlers::get_audit))
        .route(
            "/:session_id/items/:item_id/actual",
            put(handlers::set_actual_stock),
        )
        .route("/:session_id/verify", post(handlers::mark_verified))
        .route("/:session_id/confirm", post(handlers::confirm_inventory))
        .route("/:session_id/summary", get(handlers::get_audit_summary))
}

/// History journal routes
fn history_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_history))
        .route("/stats", get(handlers::get_history_stats))
        .route("/export", get(handlers::export_history))
}

/// Settings routes
fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_settings))
        .route("/profile", put(handlers::update_profile))
        .route("/locale", put(handlers::update_locale))
        .route("/notifications", put(handlers::update_email_notifications))
        .route("/telegram", put(handlers::update_telegram))
        .route("/stock-alerts", put(handlers::update_stock_alerts))
        .route("/import-export", put(handlers::update_import_export))
}
