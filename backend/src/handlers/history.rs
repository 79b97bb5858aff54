//! HTTP handlers for the history journal endpoints

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::models::{ActionStats, HistoryAction, HistoryEntry, HistoryFilter};
use shared::types::{PaginatedResponse, Pagination};

use crate::error::AppResult;
use crate::services::HistoryService;
use crate::AppState;

/// Query parameters for the journal listing
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub search: Option<String>,
    pub action: Option<HistoryAction>,
    pub user: Option<String>,
    pub project: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl HistoryQuery {
    fn filter(&self) -> HistoryFilter {
        HistoryFilter {
            date_from: self.date_from,
            date_to: self.date_to,
            search: self.search.clone(),
            action: self.action,
            user: self.user.clone(),
            project: self.project.clone(),
        }
    }

    fn pagination(&self) -> Pagination {
        let defaults = Pagination::default();
        Pagination {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// Paginated journal listing, newest first
pub async fn list_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<PaginatedResponse<HistoryEntry>>> {
    let service = HistoryService::new(state.store);
    Ok(Json(service.list(&query.filter(), query.pagination())))
}

/// Per-action counts over the filtered journal
pub async fn get_history_stats(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<ActionStats>> {
    let service = HistoryService::new(state.store);
    Ok(Json(service.action_stats(&query.filter())))
}

/// Download the filtered journal as CSV
pub async fn export_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<impl IntoResponse> {
    let service = HistoryService::new(state.store);
    let csv = service.export_csv(&query.filter())?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"history-journal.csv\"",
            ),
        ],
        csv,
    ))
}
