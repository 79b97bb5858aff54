//! Product catalog service: product and project CRUD plus bulk import

use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::Decimal;
use shared::models::{
    CreateProductInput, CreateProjectInput, DuplicateHandling, HistoryAction, HistoryEntry,
    ImportProductsInput, ImportReport, ImportRow, ImportRowError, Product, Project, StockRecord,
    StockView, UpdateProductInput,
};
use shared::validation::{validate_article_code, validate_cost_price};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::stock::stock_view;
use crate::store::{LedgerState, ReferenceKind, Store};

/// Catalog service
#[derive(Clone)]
pub struct CatalogService {
    store: Store,
}

impl CatalogService {
    /// Create a new CatalogService instance
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create a product, optionally booking an opening stock receipt
    pub fn create_product(&self, input: CreateProductInput) -> AppResult<StockView> {
        let mut state = self.store.write();
        let product = create_product_locked(&mut state, input, None)?;
        let record = state
            .stock(product.id)
            .ok_or_else(|| AppError::NotFound("Stock record".to_string()))?;
        Ok(stock_view(&product, record))
    }

    /// Update a product; the article code is immutable
    pub fn update_product(&self, product_id: Uuid, input: UpdateProductInput) -> AppResult<Product> {
        let mut state = self.store.write();

        let existing = state
            .product(product_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let name = input.name.unwrap_or(existing.name);
        let cost_price = input.cost_price.unwrap_or(existing.cost_price);
        let category = input.category.or(existing.category);
        let supplier = input.supplier.or(existing.supplier);

        if name.trim().is_empty() {
            return Err(AppError::validation("name", "Name is required"));
        }
        validate_cost_price(cost_price).map_err(|e| AppError::validation("cost_price", e))?;

        let product = state
            .product_mut(product_id)
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;
        product.name = name;
        product.cost_price = cost_price;
        product.category = category;
        product.supplier = supplier;

        Ok(product.clone())
    }

    /// Get a product
    pub fn get_product(&self, product_id: Uuid) -> AppResult<Product> {
        let state = self.store.read();
        state
            .product(product_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    /// List catalog products in insertion order
    pub fn list_products(&self) -> Vec<Product> {
        self.store.read().products.clone()
    }

    /// Bulk import from the spreadsheet template
    ///
    /// Columns: Article, Name, Initial Stock, Cost Price, Category,
    /// Supplier. Rows are validated up front; with `allow_partial_import`
    /// disabled any invalid row rejects the whole batch before a single
    /// row is applied.
    pub fn import_products(&self, input: ImportProductsInput) -> AppResult<ImportReport> {
        let mut state = self.store.write();

        let policy = input
            .duplicate_handling
            .unwrap_or(state.settings.import_export.duplicate_handling);
        let allow_partial = state.settings.import_export.allow_partial_import;
        // All-or-nothing imports must catch every rejection up front, so
        // format checks cannot be opted out of there
        let strict = state.settings.import_export.auto_validation || !allow_partial;

        let mut report = ImportReport::default();

        for (index, row) in input.rows.iter().enumerate() {
            if let Err((field, message)) = validate_import_row(row, strict) {
                report.errors.push(ImportRowError {
                    row: index,
                    field: field.to_string(),
                    message: message.to_string(),
                });
            }
        }

        if !allow_partial && !report.errors.is_empty() {
            return Ok(report);
        }

        let failed_rows: Vec<usize> = report.errors.iter().map(|e| e.row).collect();

        for (index, row) in input.rows.into_iter().enumerate() {
            if failed_rows.contains(&index) {
                continue;
            }

            let duplicate = state.product_by_article(&row.article).map(|p| p.id);
            match (duplicate, policy) {
                (None, _) => {
                    match create_product_locked(
                        &mut state,
                        import_row_input(row, None),
                        Some("Imported from spreadsheet"),
                    ) {
                        Ok(_) => report.imported += 1,
                        Err(AppError::Validation { field, message }) => {
                            report.errors.push(ImportRowError {
                                row: index,
                                field,
                                message,
                            });
                        }
                        Err(err) => return Err(err),
                    }
                }
                (Some(_), DuplicateHandling::Skip) => {
                    report.skipped += 1;
                }
                (Some(product_id), DuplicateHandling::Update) => {
                    let product = state
                        .product_mut(product_id)
                        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;
                    product.name = row.name;
                    if let Some(cost_price) = row.cost_price {
                        product.cost_price = cost_price;
                    }
                    if row.category.is_some() {
                        product.category = row.category;
                    }
                    if row.supplier.is_some() {
                        product.supplier = row.supplier;
                    }
                    report.updated += 1;
                }
                (Some(_), DuplicateHandling::Create) => {
                    let free_article = next_free_article(&state, &row.article);
                    match create_product_locked(
                        &mut state,
                        import_row_input(row, Some(free_article)),
                        Some("Imported from spreadsheet"),
                    ) {
                        Ok(_) => report.imported += 1,
                        Err(AppError::Validation { field, message }) => {
                            report.errors.push(ImportRowError {
                                row: index,
                                field,
                                message,
                            });
                        }
                        Err(err) => return Err(err),
                    }
                }
                (Some(_), DuplicateHandling::Prompt) => {
                    report.conflicts.push(row.article);
                    report.skipped += 1;
                }
            }
        }

        Ok(report)
    }

    /// Create a project
    pub fn create_project(&self, input: CreateProjectInput) -> AppResult<Project> {
        let mut state = self.store.write();

        if input.name.trim().is_empty() {
            return Err(AppError::validation("name", "Project name is required"));
        }
        if input.code.trim().is_empty() {
            return Err(AppError::validation("code", "Project code is required"));
        }
        if state.projects.iter().any(|p| p.code == input.code) {
            return Err(AppError::DuplicateEntry("project code".to_string()));
        }

        let project = Project {
            id: Uuid::new_v4(),
            name: input.name,
            code: input.code,
        };
        state.projects.push(project.clone());
        Ok(project)
    }

    /// List projects in insertion order
    pub fn list_projects(&self) -> Vec<Project> {
        self.store.read().projects.clone()
    }
}

/// Validate one import row; returns (field, message) on failure
fn validate_import_row(
    row: &ImportRow,
    strict: bool,
) -> Result<(), (&'static str, &'static str)> {
    if row.article.trim().is_empty() {
        return Err(("article", "Article is required"));
    }
    if row.name.trim().is_empty() {
        return Err(("name", "Name is required"));
    }
    if strict {
        if let Err(message) = validate_article_code(&row.article) {
            return Err(("article", message));
        }
    }
    if let Some(initial_stock) = row.initial_stock {
        if initial_stock < 0 {
            return Err(("initial_stock", "Initial stock cannot be negative"));
        }
    }
    if let Some(cost_price) = row.cost_price {
        if cost_price < Decimal::ZERO {
            return Err(("cost_price", "Cost price cannot be negative"));
        }
    }
    Ok(())
}

fn import_row_input(row: ImportRow, article_override: Option<String>) -> CreateProductInput {
    CreateProductInput {
        article: article_override.unwrap_or(row.article),
        name: row.name,
        cost_price: row.cost_price.unwrap_or(Decimal::ZERO),
        category: row.category,
        supplier: row.supplier,
        initial_stock: row.initial_stock,
    }
}

/// First unused "{article}-{n}" code, for the `create` duplicate policy
fn next_free_article(state: &LedgerState, article: &str) -> String {
    let mut n = 2;
    loop {
        let candidate = format!("{}-{}", article, n);
        if state.product_by_article(&candidate).is_none() {
            return candidate;
        }
        n += 1;
    }
}

/// Create a product and its stock record inside an existing critical section
pub(crate) fn create_product_locked(
    state: &mut LedgerState,
    input: CreateProductInput,
    receipt_comment: Option<&str>,
) -> AppResult<Product> {
    validate_article_code(&input.article).map_err(|e| AppError::validation("article", e))?;
    if input.name.trim().is_empty() {
        return Err(AppError::validation("name", "Name is required"));
    }
    validate_cost_price(input.cost_price).map_err(|e| AppError::validation("cost_price", e))?;
    if let Some(initial_stock) = input.initial_stock {
        if initial_stock < 0 {
            return Err(AppError::validation(
                "initial_stock",
                "Initial stock cannot be negative",
            ));
        }
    }
    if state.product_by_article(&input.article).is_some() {
        return Err(AppError::DuplicateEntry("article".to_string()));
    }

    let product = Product {
        id: Uuid::new_v4(),
        article: input.article,
        name: input.name,
        cost_price: input.cost_price,
        category: input.category,
        supplier: input.supplier,
        created_at: Utc::now(),
    };
    state.products.push(product.clone());
    state.stock.push(StockRecord::new(product.id));

    if let Some(initial_stock) = input.initial_stock.filter(|q| *q > 0) {
        let (before, after) = state.receive_stock(product.id, initial_stock)?;
        let reference = state.next_reference(ReferenceKind::Receipt);
        let user = state.settings.user_profile.name.clone();

        let mut details = BTreeMap::new();
        if let Some(supplier) = &product.supplier {
            details.insert("supplier".to_string(), supplier.clone());
        }

        state.history.push(HistoryEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            action: HistoryAction::Received,
            article: product.article.clone(),
            product_name: product.name.clone(),
            quantity_before: before,
            quantity_after: after,
            quantity_change: initial_stock,
            reserved_quantity: None,
            cost: product.cost_price,
            total_cost: product.cost_price * Decimal::from(initial_stock),
            user,
            project: None,
            reference: format!("Stock Receipt #{}", reference),
            comments: receipt_comment
                .map(str::to_string)
                .or_else(|| Some("Opening balance".to_string())),
            details,
        });
    }

    Ok(product)
}
