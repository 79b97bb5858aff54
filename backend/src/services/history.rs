//! History journal service: query, stats and CSV export
//!
//! The journal is append-only; entries are written by the mutating
//! services and never touched afterwards.

use shared::models::{ActionStats, HistoryAction, HistoryEntry, HistoryFilter, NO_PROJECT_SENTINEL};
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};

use crate::error::{AppError, AppResult};
use crate::store::Store;

/// History journal service
#[derive(Clone)]
pub struct HistoryService {
    store: Store,
}

impl HistoryService {
    /// Create a new HistoryService instance
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Append an externally built entry (id and timestamp already assigned)
    pub fn record(&self, entry: HistoryEntry) {
        self.store.write().history.push(entry);
    }

    /// Filtered entries, newest first
    pub fn query(&self, filter: &HistoryFilter) -> Vec<HistoryEntry> {
        let state = self.store.read();
        let mut entries: Vec<HistoryEntry> = state
            .history
            .iter()
            .filter(|e| matches_filter(e, filter))
            .cloned()
            .collect();
        entries.reverse();
        entries
    }

    /// Filtered entries with pagination, newest first
    pub fn list(
        &self,
        filter: &HistoryFilter,
        pagination: Pagination,
    ) -> PaginatedResponse<HistoryEntry> {
        let entries = self.query(filter);
        let total_items = entries.len() as u64;
        let per_page = pagination.per_page.max(1);
        let total_pages = total_items.div_ceil(per_page as u64) as u32;
        let page = pagination.page.max(1);

        let start = ((page - 1) * per_page) as usize;
        let data = entries
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .collect();

        PaginatedResponse {
            data,
            pagination: PaginationMeta {
                page,
                per_page,
                total_items,
                total_pages,
            },
        }
    }

    /// Per-action entry counts over the filtered journal
    pub fn action_stats(&self, filter: &HistoryFilter) -> ActionStats {
        let state = self.store.read();
        let mut stats = ActionStats::default();
        for entry in state.history.iter().filter(|e| matches_filter(e, filter)) {
            match entry.action {
                HistoryAction::Received => stats.received += 1,
                HistoryAction::Outgoing => stats.outgoing += 1,
                HistoryAction::Reserved => stats.reserved += 1,
                HistoryAction::Audit => stats.audit += 1,
            }
        }
        stats
    }

    /// Export the filtered journal as CSV
    ///
    /// Header: `Date,Time,Action,Article,Product Name,Quantity Change,
    /// User,Project,Reference`; a missing project renders as `N/A`.
    pub fn export_csv(&self, filter: &HistoryFilter) -> AppResult<String> {
        let entries = self.query(filter);

        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.write_record([
            "Date",
            "Time",
            "Action",
            "Article",
            "Product Name",
            "Quantity Change",
            "User",
            "Project",
            "Reference",
        ])
        .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;

        for entry in &entries {
            wtr.write_record([
                entry.timestamp.format("%m/%d/%Y").to_string(),
                entry.timestamp.format("%H:%M:%S").to_string(),
                entry.action.as_str().to_string(),
                entry.article.clone(),
                entry.product_name.clone(),
                entry.quantity_change.to_string(),
                entry.user.clone(),
                entry.project.clone().unwrap_or_else(|| "N/A".to_string()),
                entry.reference.clone(),
            ])
            .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }

        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}

fn matches_filter(entry: &HistoryEntry, filter: &HistoryFilter) -> bool {
    let entry_date = entry.timestamp.date_naive();
    if let Some(date_from) = filter.date_from {
        if entry_date < date_from {
            return false;
        }
    }
    if let Some(date_to) = filter.date_to {
        if entry_date > date_to {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        if !entry.article.to_lowercase().contains(&needle)
            && !entry.product_name.to_lowercase().contains(&needle)
        {
            return false;
        }
    }
    if let Some(action) = filter.action {
        if entry.action != action {
            return false;
        }
    }
    if let Some(user) = &filter.user {
        if &entry.user != user {
            return false;
        }
    }
    if let Some(project) = &filter.project {
        if project == NO_PROJECT_SENTINEL {
            if entry.project.is_some() {
                return false;
            }
        } else if entry.project.as_deref() != Some(project.as_str()) {
            return false;
        }
    }
    true
}
