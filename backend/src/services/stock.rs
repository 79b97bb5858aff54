//! Stock ledger service: receipts, balances and warehouse aggregates
//!
//! Allocation and adjustment primitives live on `LedgerState` so that the
//! expense and audit services can compose them with their own writes in a
//! single critical section.

use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::Decimal;
use shared::models::{
    HistoryAction, HistoryEntry, Product, ReceiveStockInput, StockFilter, StockRecord, StockView,
    WarehouseSummary,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::{ReferenceKind, Store};

/// Stock ledger service
#[derive(Clone)]
pub struct StockService {
    store: Store,
}

/// Build the dashboard row for one product
pub(crate) fn stock_view(product: &Product, record: &StockRecord) -> StockView {
    StockView {
        product: product.clone(),
        received_quantity: record.received_quantity,
        outgoing_quantity: record.outgoing_quantity,
        reserved_quantity: record.reserved_quantity,
        remaining_stock: record.remaining_stock,
        available: record.available(),
        stock_value: product.cost_price * Decimal::from(record.remaining_stock),
    }
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Book a stock receipt against a product
    pub fn receive(&self, product_id: Uuid, input: ReceiveStockInput) -> AppResult<StockView> {
        let mut state = self.store.write();

        let product = state
            .product(product_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let date = input.date.unwrap_or_else(|| Utc::now().date_naive());
        let unit_cost = input.unit_cost.unwrap_or(product.cost_price);
        if unit_cost < Decimal::ZERO {
            return Err(AppError::validation(
                "unit_cost",
                "Unit cost cannot be negative",
            ));
        }
        let (before, after) = state.receive_stock(product_id, input.quantity)?;

        let reference = state.next_reference(ReferenceKind::Receipt);
        let user = input
            .user
            .unwrap_or_else(|| state.settings.user_profile.name.clone());

        let mut details = BTreeMap::new();
        details.insert("delivery_date".to_string(), date.to_string());
        if let Some(supplier) = &input.supplier {
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
            quantity_change: input.quantity,
            reserved_quantity: None,
            cost: unit_cost,
            total_cost: unit_cost * Decimal::from(input.quantity),
            user,
            project: None,
            reference: format!("Stock Receipt #{}", reference),
            comments: input.comments,
            details,
        });

        let record = state
            .stock(product_id)
            .ok_or_else(|| AppError::NotFound("Stock record".to_string()))?;
        Ok(stock_view(&product, record))
    }

    /// Get the stock view for one product
    pub fn get_stock(&self, product_id: Uuid) -> AppResult<StockView> {
        let state = self.store.read();
        let product = state
            .product(product_id)
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;
        let record = state
            .stock(product_id)
            .ok_or_else(|| AppError::NotFound("Stock record".to_string()))?;
        Ok(stock_view(product, record))
    }

    /// List stock views, optionally filtered
    pub fn list_stock(&self, filter: &StockFilter) -> Vec<StockView> {
        let state = self.store.read();
        let critical_threshold = state.settings.stock_alerts.critical_threshold;

        state
            .products
            .iter()
            .filter_map(|product| state.stock(product.id).map(|record| (product, record)))
            .filter(|(product, record)| {
                if let Some(search) = &filter.search {
                    let needle = search.to_lowercase();
                    if !product.article.to_lowercase().contains(&needle)
                        && !product.name.to_lowercase().contains(&needle)
                    {
                        return false;
                    }
                }
                if filter.critical_only
                    && !shared::validation::is_critical_stock(
                        record.remaining_stock,
                        critical_threshold,
                    )
                {
                    return false;
                }
                true
            })
            .map(|(product, record)| stock_view(product, record))
            .collect()
    }

    /// History entries for one product, newest first
    pub fn get_movements(&self, product_id: Uuid) -> AppResult<Vec<HistoryEntry>> {
        let state = self.store.read();
        let product = state
            .product(product_id)
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;
        let mut movements: Vec<HistoryEntry> = state
            .history
            .iter()
            .filter(|e| e.article == product.article)
            .cloned()
            .collect();
        movements.reverse();
        Ok(movements)
    }

    /// Warehouse-wide aggregates for the dashboard header
    pub fn summary(&self) -> WarehouseSummary {
        let state = self.store.read();
        let alerts = &state.settings.stock_alerts;

        let mut summary = WarehouseSummary {
            total_products: state.products.len() as i64,
            total_remaining: 0,
            total_reserved: 0,
            total_stock_value: Decimal::ZERO,
            critical_count: 0,
            low_count: 0,
        };

        for product in &state.products {
            let Some(record) = state.stock(product.id) else {
                continue;
            };
            summary.total_remaining += record.remaining_stock;
            summary.total_reserved += record.reserved_quantity;
            summary.total_stock_value +=
                product.cost_price * Decimal::from(record.remaining_stock);
            if shared::validation::is_critical_stock(
                record.remaining_stock,
                alerts.critical_threshold,
            ) {
                summary.critical_count += 1;
            }
            if shared::validation::is_low_stock(record.remaining_stock, alerts.low_threshold) {
                summary.low_count += 1;
            }
        }

        summary
    }
}
