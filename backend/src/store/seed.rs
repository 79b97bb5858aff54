//! Demo catalog seeding for development environments
//!
//! Runs every row through the regular services so the seeded ledger is
//! fully consistent (stock records, history entries, references).

use rust_decimal::Decimal;
use shared::models::{CreateProductInput, CreateProjectInput};

use crate::error::AppResult;
use crate::services::CatalogService;
use crate::store::Store;

/// (article, name, cost price in cents, category, supplier, initial stock)
const DEMO_PRODUCTS: &[(&str, &str, i64, &str, &str, i64)] = &[
    (
        "PNL-001",
        "Standard Wall Panel 2400x1200",
        12550,
        "Wall Panels",
        "Standard Materials Co",
        75,
    ),
    (
        "PNL-002",
        "Insulated Panel 2400x600",
        8975,
        "Wall Panels",
        "Insulation Pro Ltd",
        50,
    ),
    (
        "DIV-001",
        "Office Divider 1800x900",
        15625,
        "Dividers",
        "Office Solutions Inc",
        30,
    ),
    (
        "DIV-002",
        "Glass Partition 2100x1200",
        23480,
        "Dividers",
        "Glass Tech Corp",
        20,
    ),
    (
        "ACC-001",
        "Mounting Brackets Set",
        1245,
        "Accessories",
        "Hardware Solutions Ltd",
        200,
    ),
    (
        "ACC-002",
        "Sealing Strip 3m",
        890,
        "Accessories",
        "Hardware Solutions Ltd",
        120,
    ),
];

const DEMO_PROJECTS: &[(&str, &str)] = &[
    ("Office Building A - Phase 1", "OBA-P1"),
    ("Warehouse Expansion", "WH-EXP"),
    ("Retail Store Renovation", "RS-REN"),
    ("Factory Floor Upgrade", "FF-UPG"),
    ("Administrative Complex", "ADM-CX"),
];

/// Seed demo products and projects into an empty store
pub fn seed_demo_data(store: &Store) -> AppResult<()> {
    if !store.read().products.is_empty() {
        return Ok(());
    }

    let catalog = CatalogService::new(store.clone());

    for (article, name, cost_cents, category, supplier, initial_stock) in DEMO_PRODUCTS {
        catalog.create_product(CreateProductInput {
            article: article.to_string(),
            name: name.to_string(),
            cost_price: Decimal::new(*cost_cents, 2),
            category: Some(category.to_string()),
            supplier: Some(supplier.to_string()),
            initial_stock: Some(*initial_stock),
        })?;
    }

    for (name, code) in DEMO_PROJECTS {
        catalog.create_project(CreateProjectInput {
            name: name.to_string(),
            code: code.to_string(),
        })?;
    }

    tracing::info!(
        products = DEMO_PRODUCTS.len(),
        projects = DEMO_PROJECTS.len(),
        "Seeded demo catalog"
    );
    Ok(())
}
