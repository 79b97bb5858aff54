//! The in-memory inventory ledger store
//!
//! Single source of truth for products, stock records, expenses, reserves,
//! audits, history and settings. All screens read and mutate the same
//! state through the services; a mutation and its history entry happen
//! inside one write-lock critical section, so callers observe them
//! atomically. Writes across all products are serialized by the lock.

mod seed;

pub use seed::seed_demo_data;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{Datelike, Utc};
use shared::models::{
    AuditSession, Expense, HistoryEntry, Product, Project, Reserve, ReserveStatus, Settings,
    StockRecord, generate_reference,
};
use uuid::Uuid;

use crate::error::AppError;

/// Document reference kinds, one counter per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Receipt,
    Expense,
    Reserve,
    Audit,
}

impl ReferenceKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            ReferenceKind::Receipt => "SR",
            ReferenceKind::Expense => "EXP",
            ReferenceKind::Reserve => "RSV",
            ReferenceKind::Audit => "AUD",
        }
    }
}

/// Sequence counters backing document reference numbers
#[derive(Debug, Default)]
struct ReferenceCounters {
    receipt: u32,
    expense: u32,
    reserve: u32,
    audit: u32,
}

/// All ledger state; collections keep insertion order
#[derive(Debug, Default)]
pub struct LedgerState {
    pub products: Vec<Product>,
    pub stock: Vec<StockRecord>,
    pub projects: Vec<Project>,
    pub expenses: Vec<Expense>,
    pub reserves: Vec<Reserve>,
    pub audits: Vec<AuditSession>,
    pub history: Vec<HistoryEntry>,
    pub settings: Settings,
    counters: ReferenceCounters,
}

impl LedgerState {
    pub fn product(&self, id: Uuid) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn product_mut(&mut self, id: Uuid) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }

    pub fn product_by_article(&self, article: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.article == article)
    }

    pub fn project(&self, id: Uuid) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn stock(&self, product_id: Uuid) -> Option<&StockRecord> {
        self.stock.iter().find(|s| s.product_id == product_id)
    }

    fn stock_mut(&mut self, product_id: Uuid) -> Result<&mut StockRecord, AppError> {
        self.stock
            .iter_mut()
            .find(|s| s.product_id == product_id)
            .ok_or_else(|| AppError::NotFound("Stock record".to_string()))
    }

    /// Next reference number for a document kind, e.g. "EXP-2024-0003"
    pub fn next_reference(&mut self, kind: ReferenceKind) -> String {
        let counter = match kind {
            ReferenceKind::Receipt => &mut self.counters.receipt,
            ReferenceKind::Expense => &mut self.counters.expense,
            ReferenceKind::Reserve => &mut self.counters.reserve,
            ReferenceKind::Audit => &mut self.counters.audit,
        };
        *counter += 1;
        generate_reference(kind.prefix(), Utc::now().year(), *counter)
    }

    // ------------------------------------------------------------------
    // Core stock mutations
    //
    // Each returns (remaining_before, remaining_after) and preserves the
    // invariants `remaining == received - outgoing` and `remaining >= 0`.
    // Validation happens before any field is touched, so a rejected call
    // leaves the record untouched.
    // ------------------------------------------------------------------

    /// Book a stock receipt
    pub fn receive_stock(&mut self, product_id: Uuid, quantity: i64) -> Result<(i64, i64), AppError> {
        if quantity <= 0 {
            return Err(AppError::validation("quantity", "Quantity must be positive"));
        }
        let record = self.stock_mut(product_id)?;
        let before = record.remaining_stock;
        record.received_quantity += quantity;
        record.remaining_stock += quantity;
        Ok((before, record.remaining_stock))
    }

    /// Book an outgoing allocation
    pub fn allocate_stock(
        &mut self,
        product_id: Uuid,
        quantity: i64,
    ) -> Result<(i64, i64), AppError> {
        if quantity <= 0 {
            return Err(AppError::validation("quantity", "Quantity must be positive"));
        }
        let record = self.stock_mut(product_id)?;
        if quantity > record.remaining_stock {
            return Err(AppError::InsufficientStock {
                available: record.remaining_stock,
                requested: quantity,
            });
        }
        let before = record.remaining_stock;
        record.outgoing_quantity += quantity;
        record.remaining_stock -= quantity;
        Ok((before, record.remaining_stock))
    }

    /// Exact inverse of [`allocate_stock`], used on expense delete/decrease
    pub fn reverse_allocation(
        &mut self,
        product_id: Uuid,
        quantity: i64,
    ) -> Result<(i64, i64), AppError> {
        if quantity <= 0 {
            return Err(AppError::validation("quantity", "Quantity must be positive"));
        }
        let record = self.stock_mut(product_id)?;
        if quantity > record.outgoing_quantity {
            return Err(AppError::InvalidAdjustment(format!(
                "Cannot reverse {} units; only {} are booked as outgoing",
                quantity, record.outgoing_quantity
            )));
        }
        let before = record.remaining_stock;
        record.outgoing_quantity -= quantity;
        record.remaining_stock += quantity;
        Ok((before, record.remaining_stock))
    }

    /// Apply a signed correction (audit write-back)
    ///
    /// A positive delta is booked into received, a negative one into
    /// outgoing, keeping `remaining == received - outgoing` intact.
    pub fn adjust_stock(&mut self, product_id: Uuid, delta: i64) -> Result<(i64, i64), AppError> {
        let record = self.stock_mut(product_id)?;
        if record.remaining_stock + delta < 0 {
            return Err(AppError::InvalidAdjustment(format!(
                "Adjustment of {} would drive remaining stock below zero (currently {})",
                delta, record.remaining_stock
            )));
        }
        let before = record.remaining_stock;
        if delta >= 0 {
            record.received_quantity += delta;
        } else {
            record.outgoing_quantity += -delta;
        }
        record.remaining_stock += delta;
        Ok((before, record.remaining_stock))
    }

    /// Recompute every product's soft-hold total from its active reserves
    pub fn recompute_reserved_quantities(&mut self) {
        for record in &mut self.stock {
            record.reserved_quantity = 0;
        }
        let holds: Vec<(String, i64)> = self
            .reserves
            .iter()
            .filter(|r| r.status == ReserveStatus::Active)
            .flat_map(|r| {
                r.items
                    .iter()
                    .map(|i| (i.article.clone(), i.reserved_quantity))
            })
            .collect();
        for (article, quantity) in holds {
            if let Some(product_id) = self.product_by_article(&article).map(|p| p.id) {
                if let Ok(record) = self.stock_mut(product_id) {
                    record.reserved_quantity += quantity;
                }
            }
        }
    }
}

/// Cloneable handle to the shared ledger state
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<LedgerState>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the state for reading
    pub fn read(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Acquire the state for writing; one critical section = one atomic
    /// ledger operation
    pub fn write(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}
