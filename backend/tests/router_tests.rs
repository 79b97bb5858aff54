//! Router smoke tests
//!
//! Drive the axum router end to end with `tower::ServiceExt::oneshot`,
//! covering the JSON bodies, the CSV download and the error shape.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use warehouse_ledger_backend::config::{Config, LedgerConfig, ServerConfig};
use warehouse_ledger_backend::store::{seed_demo_data, Store};
use warehouse_ledger_backend::{create_app, AppState};

fn test_app() -> axum::Router {
    let store = Store::new();
    seed_demo_data(&store).unwrap();
    let config = Config {
        environment: "test".to_string(),
        server: ServerConfig::default(),
        ledger: LedgerConfig {
            seed_demo_data: false,
        },
    };
    create_app(AppState {
        store,
        config: Arc::new(config),
    })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_root_and_health() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["products"], 6);
}

#[tokio::test]
async fn test_list_stock_returns_seeded_products() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/warehouse/stock")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0]["article"], "PNL-001");
    assert_eq!(rows[0]["remaining_stock"], 75);
}

#[tokio::test]
async fn test_create_expense_via_api() {
    let app = test_app();

    let stock = body_json(
        app.clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/warehouse/stock")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap(),
    )
    .await;
    let projects = body_json(
        app.clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/warehouse/projects")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap(),
    )
    .await;

    let payload = json!({
        "product_id": stock[0]["id"],
        "project_id": projects[0]["id"],
        "quantity": 15,
        "date": "2024-01-15"
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/expenses")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let expense = body_json(response).await;
    assert_eq!(expense["quantity"], 15);
    assert_eq!(expense["total_cost"], "1882.50");

    // Stock was decremented
    let stock = body_json(
        app.oneshot(
            Request::builder()
                .uri("/api/v1/warehouse/stock")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap(),
    )
    .await;
    assert_eq!(stock[0]["remaining_stock"], 60);
}

#[tokio::test]
async fn test_insufficient_stock_error_shape() {
    let app = test_app();

    let stock = body_json(
        app.clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/warehouse/stock")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap(),
    )
    .await;
    let projects = body_json(
        app.clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/warehouse/projects")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap(),
    )
    .await;

    let payload = json!({
        "product_id": stock[0]["id"],
        "project_id": projects[0]["id"],
        "quantity": 1000,
        "date": "2024-01-15"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/expenses")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INSUFFICIENT_STOCK");
}

#[tokio::test]
async fn test_history_export_is_csv() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/history/export")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/csv"
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    // Header plus one receipt row per seeded product
    assert_eq!(csv.lines().count(), 7);
    assert!(csv.starts_with("Date,Time,Action,Article"));
}

#[tokio::test]
async fn test_settings_roundtrip() {
    let app = test_app();

    let payload = json!({
        "critical_threshold": 3,
        "low_threshold": 8,
        "enable_critical_alerts": true,
        "enable_low_stock_alerts": false,
        "alert_frequency": "daily",
        "channels": {"email": true, "telegram": false, "in_app": true}
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/v1/settings/stock-alerts")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let settings = body_json(
        app.oneshot(
            Request::builder()
                .uri("/api/v1/settings")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap(),
    )
    .await;
    assert_eq!(settings["stock_alerts"]["critical_threshold"], 3);
    assert_eq!(settings["stock_alerts"]["alert_frequency"], "daily");
}
