//! Inventory audit service
//!
//! One session may be in progress at a time. Confirming a session writes
//! the counted quantities back into the ledger and records one history
//! entry per changed item; `Completed` is terminal.

use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::Decimal;
use shared::models::{
    AuditItem, AuditSession, AuditSessionOverview, AuditStatus, AuditSummary, HistoryAction,
    HistoryEntry, StartAuditInput,
};
use shared::validation::validate_counted_stock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::{ReferenceKind, Store};

/// Inventory audit service
#[derive(Clone)]
pub struct AuditService {
    store: Store,
}

impl AuditService {
    /// Create a new AuditService instance
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Start a session, snapshotting every stock record
    pub fn start_session(&self, input: StartAuditInput) -> AppResult<AuditSession> {
        let mut state = self.store.write();

        if state
            .audits
            .iter()
            .any(|a| a.status == AuditStatus::InProgress)
        {
            return Err(AppError::InvalidStateTransition(
                "An audit is already in progress".to_string(),
            ));
        }

        let items: Vec<AuditItem> = state
            .products
            .iter()
            .filter_map(|product| state.stock(product.id).map(|record| (product, record)))
            .map(|(product, record)| AuditItem {
                id: Uuid::new_v4(),
                article: product.article.clone(),
                product_name: product.name.clone(),
                system_stock: record.remaining_stock,
                // Defaults to the system figure until counted
                actual_stock: record.remaining_stock,
                variance: 0,
                verified: false,
                cost_price: product.cost_price,
            })
            .collect();

        let session = AuditSession {
            id: Uuid::new_v4(),
            audit_date: input.audit_date.unwrap_or_else(|| Utc::now().date_naive()),
            auditor_name: input
                .auditor_name
                .unwrap_or_else(|| state.settings.user_profile.name.clone()),
            status: AuditStatus::InProgress,
            items,
            created_at: Utc::now(),
            completed_at: None,
        };
        state.audits.push(session.clone());
        Ok(session)
    }

    /// The session currently in progress
    pub fn current_session(&self) -> AppResult<AuditSession> {
        let state = self.store.read();
        state
            .audits
            .iter()
            .find(|a| a.status == AuditStatus::InProgress)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Audit in progress".to_string()))
    }

    /// Get one session
    pub fn get_session(&self, session_id: Uuid) -> AppResult<AuditSession> {
        let state = self.store.read();
        state
            .audits
            .iter()
            .find(|a| a.id == session_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Audit session".to_string()))
    }

    /// Record a counted quantity for one item
    pub fn set_actual_stock(
        &self,
        session_id: Uuid,
        item_id: Uuid,
        actual_stock: i64,
    ) -> AppResult<AuditItem> {
        validate_counted_stock(actual_stock)
            .map_err(|e| AppError::validation("actual_stock", e))?;

        let mut state = self.store.write();
        let session = state
            .audits
            .iter_mut()
            .find(|a| a.id == session_id)
            .ok_or_else(|| AppError::NotFound("Audit session".to_string()))?;
        if session.status == AuditStatus::Completed {
            return Err(AppError::InvalidStateTransition(
                "Audit is already completed".to_string(),
            ));
        }

        let item = session
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| AppError::NotFound("Audit item".to_string()))?;
        item.actual_stock = actual_stock;
        item.variance = actual_stock - item.system_stock;
        Ok(item.clone())
    }

    /// Flag items as physically verified; a checklist marker only
    pub fn mark_verified(&self, session_id: Uuid, item_ids: &[Uuid]) -> AppResult<AuditSession> {
        let mut state = self.store.write();
        let session = state
            .audits
            .iter_mut()
            .find(|a| a.id == session_id)
            .ok_or_else(|| AppError::NotFound("Audit session".to_string()))?;
        if session.status == AuditStatus::Completed {
            return Err(AppError::InvalidStateTransition(
                "Audit is already completed".to_string(),
            ));
        }

        for item in session.items.iter_mut() {
            if item_ids.contains(&item.id) {
                item.verified = true;
            }
        }
        Ok(session.clone())
    }

    /// Complete the session, writing counted quantities back to the ledger
    pub fn confirm_inventory(&self, session_id: Uuid) -> AppResult<AuditSession> {
        let mut state = self.store.write();

        let session = state
            .audits
            .iter()
            .find(|a| a.id == session_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Audit session".to_string()))?;
        if session.status == AuditStatus::Completed {
            return Err(AppError::InvalidStateTransition(
                "Audit is already completed".to_string(),
            ));
        }

        let reference = state.next_reference(ReferenceKind::Audit);

        for item in session.items.iter().filter(|i| i.variance != 0) {
            let Some(product_id) = state.product_by_article(&item.article).map(|p| p.id) else {
                continue;
            };
            let remaining = state
                .stock(product_id)
                .map(|r| r.remaining_stock)
                .unwrap_or(0);
            // Overwrite to the counted figure; the delta can never drive
            // remaining below zero because actual_stock >= 0
            let delta = item.actual_stock - remaining;
            if delta == 0 {
                continue;
            }
            let (before, after) = state.adjust_stock(product_id, delta)?;

            let mut details = BTreeMap::new();
            details.insert("audit_date".to_string(), session.audit_date.to_string());
            details.insert("variance".to_string(), item.variance.to_string());

            state.history.push(HistoryEntry {
                id: Uuid::new_v4(),
                timestamp: Utc::now(),
                action: HistoryAction::Audit,
                article: item.article.clone(),
                product_name: item.product_name.clone(),
                quantity_before: before,
                quantity_after: after,
                quantity_change: delta,
                reserved_quantity: None,
                cost: item.cost_price,
                total_cost: item.cost_price * Decimal::from(delta.abs()),
                user: session.auditor_name.clone(),
                project: None,
                reference: format!("Audit #{}", reference),
                comments: Some("Physical count discrepancy".to_string()),
                details,
            });
        }

        let session = state
            .audits
            .iter_mut()
            .find(|a| a.id == session_id)
            .ok_or_else(|| AppError::NotFound("Audit session".to_string()))?;
        session.status = AuditStatus::Completed;
        session.completed_at = Some(Utc::now());
        Ok(session.clone())
    }

    /// Aggregate counts for one session
    pub fn summary(&self, session_id: Uuid) -> AppResult<AuditSummary> {
        let session = self.get_session(session_id)?;
        Ok(summarize(&session))
    }

    /// Past and current sessions, newest first
    pub fn list_sessions(&self) -> Vec<AuditSessionOverview> {
        let state = self.store.read();
        let mut sessions: Vec<AuditSessionOverview> = state
            .audits
            .iter()
            .map(|session| {
                let summary = summarize(session);
                AuditSessionOverview {
                    id: session.id,
                    audit_date: session.audit_date,
                    auditor_name: session.auditor_name.clone(),
                    status: session.status,
                    total_items: summary.total_items,
                    total_variances: summary.total_variances,
                    created_at: session.created_at,
                }
            })
            .collect();
        sessions.reverse();
        sessions
    }
}

/// Compute the summary aggregates over a session's items
pub fn summarize(session: &AuditSession) -> AuditSummary {
    AuditSummary {
        total_items: session.items.len() as i64,
        total_variances: session.items.iter().filter(|i| i.variance != 0).count() as i64,
        positive_variances: session.items.iter().filter(|i| i.variance > 0).count() as i64,
        negative_variances: session.items.iter().filter(|i| i.variance < 0).count() as i64,
        verified_items: session.items.iter().filter(|i| i.verified).count() as i64,
    }
}
