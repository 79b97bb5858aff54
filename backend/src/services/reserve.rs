//! Reserve management service
//!
//! Reserves are soft holds: an active reserve raises the per-product
//! `reserved_quantity` and lowers the derived availability figure, but it
//! never mutates `remaining_stock`.

use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::Decimal;
use shared::models::{
    CreateReserveInput, HistoryAction, HistoryEntry, Reserve, ReserveFilter, ReserveItem,
    ReserveStatus,
};
use shared::validation::validate_reservation_date;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::{LedgerState, ReferenceKind, Store};

/// Reserve management service
#[derive(Clone)]
pub struct ReserveService {
    store: Store,
}

impl ReserveService {
    /// Create a new ReserveService instance
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create a reserve
    pub fn create(&self, input: CreateReserveInput) -> AppResult<Reserve> {
        let mut state = self.store.write();
        validate_reserve_input(&state, &input, None)?;

        let created_by = input
            .created_by
            .unwrap_or_else(|| state.settings.user_profile.name.clone());

        let items: Vec<ReserveItem> = input
            .items
            .iter()
            .map(|item| ReserveItem {
                id: Uuid::new_v4(),
                article: item.article.clone(),
                product_name: item.product_name.clone(),
                reserved_quantity: item.reserved_quantity,
                comments: item.comments.clone(),
            })
            .collect();

        let reserve = Reserve {
            id: Uuid::new_v4(),
            project_name: input.project_name,
            reservation_date: input.reservation_date,
            status: ReserveStatus::Active,
            total_items: items.len() as i64,
            total_quantity: items.iter().map(|i| i.reserved_quantity).sum(),
            items,
            created_by: created_by.clone(),
            created_at: Utc::now(),
        };
        state.reserves.push(reserve.clone());
        state.recompute_reserved_quantities();

        let reference = state.next_reference(ReferenceKind::Reserve);
        for item in &reserve.items {
            // Validated against the catalog above, so the lookup succeeds
            let Some(product) = state.product_by_article(&item.article).cloned() else {
                continue;
            };
            let Some(record) = state.stock(product.id) else {
                continue;
            };
            let remaining = record.remaining_stock;

            let mut details = BTreeMap::new();
            details.insert(
                "reserve_date".to_string(),
                reserve.reservation_date.to_string(),
            );

            state.history.push(HistoryEntry {
                id: Uuid::new_v4(),
                timestamp: Utc::now(),
                action: HistoryAction::Reserved,
                article: item.article.clone(),
                product_name: item.product_name.clone(),
                quantity_before: remaining,
                quantity_after: remaining,
                quantity_change: 0,
                reserved_quantity: Some(item.reserved_quantity),
                cost: product.cost_price,
                total_cost: product.cost_price * Decimal::from(item.reserved_quantity),
                user: created_by.clone(),
                project: Some(reserve.project_name.clone()),
                reference: format!("Reserve #{}", reference),
                comments: item.comments.clone(),
                details,
            });
        }

        Ok(reserve)
    }

    /// Replace a reserve wholesale; status and creation metadata survive
    pub fn update(&self, reserve_id: Uuid, input: CreateReserveInput) -> AppResult<Reserve> {
        let mut state = self.store.write();

        if !state.reserves.iter().any(|r| r.id == reserve_id) {
            return Err(AppError::NotFound("Reserve".to_string()));
        }
        // The reserve's own hold is being replaced, so it does not count
        // against availability
        validate_reserve_input(&state, &input, Some(reserve_id))?;

        let items: Vec<ReserveItem> = input
            .items
            .iter()
            .map(|item| ReserveItem {
                id: Uuid::new_v4(),
                article: item.article.clone(),
                product_name: item.product_name.clone(),
                reserved_quantity: item.reserved_quantity,
                comments: item.comments.clone(),
            })
            .collect();

        let reserve = state
            .reserves
            .iter_mut()
            .find(|r| r.id == reserve_id)
            .ok_or_else(|| AppError::NotFound("Reserve".to_string()))?;
        reserve.project_name = input.project_name;
        reserve.reservation_date = input.reservation_date;
        reserve.total_items = items.len() as i64;
        reserve.total_quantity = items.iter().map(|i| i.reserved_quantity).sum();
        reserve.items = items;
        let updated = reserve.clone();

        state.recompute_reserved_quantities();
        Ok(updated)
    }

    /// Toggle a reserve between Active and Cancelled
    ///
    /// Pure status transition; cancelling releases the soft hold.
    pub fn set_status(&self, reserve_id: Uuid, status: ReserveStatus) -> AppResult<Reserve> {
        let mut state = self.store.write();

        let reserve = state
            .reserves
            .iter_mut()
            .find(|r| r.id == reserve_id)
            .ok_or_else(|| AppError::NotFound("Reserve".to_string()))?;
        reserve.status = status;
        let updated = reserve.clone();

        state.recompute_reserved_quantities();
        Ok(updated)
    }

    /// Delete a reserve (confirmation is the caller's concern)
    pub fn delete(&self, reserve_id: Uuid) -> AppResult<()> {
        let mut state = self.store.write();

        if !state.reserves.iter().any(|r| r.id == reserve_id) {
            return Err(AppError::NotFound("Reserve".to_string()));
        }
        state.reserves.retain(|r| r.id != reserve_id);
        state.recompute_reserved_quantities();
        Ok(())
    }

    /// Get one reserve
    pub fn get(&self, reserve_id: Uuid) -> AppResult<Reserve> {
        let state = self.store.read();
        state
            .reserves
            .iter()
            .find(|r| r.id == reserve_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Reserve".to_string()))
    }

    /// Filtered listing in insertion order
    pub fn list(&self, filter: &ReserveFilter) -> Vec<Reserve> {
        let state = self.store.read();
        state
            .reserves
            .iter()
            .filter(|reserve| {
                if let Some(project) = &filter.project {
                    if &reserve.project_name != project {
                        return false;
                    }
                }
                if let Some(status) = filter.status {
                    if reserve.status != status {
                        return false;
                    }
                }
                if let Some(search) = &filter.search {
                    let needle = search.to_lowercase();
                    let in_items = reserve.items.iter().any(|i| {
                        i.article.to_lowercase().contains(&needle)
                            || i.product_name.to_lowercase().contains(&needle)
                    });
                    if !reserve.project_name.to_lowercase().contains(&needle) && !in_items {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect()
    }
}

/// Quantity free to reserve for an article, ignoring one reserve's holds
fn available_to_reserve(state: &LedgerState, article: &str, exclude: Option<Uuid>) -> i64 {
    let Some(product) = state.product_by_article(article) else {
        return 0;
    };
    let remaining = state
        .stock(product.id)
        .map(|r| r.remaining_stock)
        .unwrap_or(0);
    let held: i64 = state
        .reserves
        .iter()
        .filter(|r| r.status == ReserveStatus::Active && Some(r.id) != exclude)
        .flat_map(|r| r.items.iter())
        .filter(|i| i.article == article)
        .map(|i| i.reserved_quantity)
        .sum();
    (remaining - held).max(0)
}

/// Validate a create/replace reserve input against the catalog
fn validate_reserve_input(
    state: &LedgerState,
    input: &CreateReserveInput,
    exclude: Option<Uuid>,
) -> AppResult<()> {
    if input.project_name.trim().is_empty() {
        return Err(AppError::validation(
            "project_name",
            "Project name is required",
        ));
    }
    let today = Utc::now().date_naive();
    validate_reservation_date(input.reservation_date, today)
        .map_err(|e| AppError::validation("reservation_date", e))?;
    if input.items.is_empty() {
        return Err(AppError::validation(
            "items",
            "At least one item is required",
        ));
    }

    for item in &input.items {
        if item.article.trim().is_empty() {
            return Err(AppError::validation("article", "Article is required"));
        }
        if item.product_name.trim().is_empty() {
            return Err(AppError::validation(
                "product_name",
                "Product name is required",
            ));
        }
        if item.reserved_quantity <= 0 {
            return Err(AppError::validation(
                "reserved_quantity",
                "Valid quantity is required",
            ));
        }

        if state.product_by_article(&item.article).is_none() {
            return Err(AppError::validation("article", "Unknown article"));
        }
        // Soft-hold policy: holds come out of the availability view, not
        // out of remaining stock
        let available = available_to_reserve(state, &item.article, exclude);
        if item.reserved_quantity > available {
            return Err(AppError::InsufficientStock {
                available,
                requested: item.reserved_quantity,
            });
        }
    }
    Ok(())
}
