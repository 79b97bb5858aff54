//! Warehouse Ledger Service - Backend Server

use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use warehouse_ledger_backend::{create_app, store, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wls_server=debug,warehouse_ledger_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Warehouse Ledger Server");
    tracing::info!("Environment: {}", config.environment);

    // Create the in-memory ledger store
    let ledger = store::Store::new();
    if config.ledger.seed_demo_data {
        store::seed_demo_data(&ledger)
            .map_err(|e| anyhow::anyhow!("Demo seeding failed: {e}"))?;
    }

    // Create application state
    let state = AppState {
        store: ledger,
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
