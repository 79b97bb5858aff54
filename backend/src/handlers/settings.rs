//! HTTP handlers for the settings endpoints

use axum::{extract::State, Json};
use shared::models::{
    EmailNotificationSettings, ImportExportSettings, LocaleSettings, Settings, StockAlertSettings,
    TelegramSettings, UserProfile,
};

use crate::error::AppResult;
use crate::services::SettingsService;
use crate::AppState;

/// All settings sections
pub async fn get_settings(State(state): State<AppState>) -> AppResult<Json<Settings>> {
    let service = SettingsService::new(state.store);
    Ok(Json(service.get()))
}

/// Save the user profile
pub async fn update_profile(
    State(state): State<AppState>,
    Json(input): Json<UserProfile>,
) -> AppResult<Json<UserProfile>> {
    let service = SettingsService::new(state.store);
    let profile = service.update_profile(input)?;
    Ok(Json(profile))
}

/// Save language and regional formats
pub async fn update_locale(
    State(state): State<AppState>,
    Json(input): Json<LocaleSettings>,
) -> AppResult<Json<LocaleSettings>> {
    let service = SettingsService::new(state.store);
    let locale = service.update_locale(input)?;
    Ok(Json(locale))
}

/// Save the SMTP configuration
pub async fn update_email_notifications(
    State(state): State<AppState>,
    Json(input): Json<EmailNotificationSettings>,
) -> AppResult<Json<EmailNotificationSettings>> {
    let service = SettingsService::new(state.store);
    let settings = service.update_email_notifications(input)?;
    Ok(Json(settings))
}

/// Save the Telegram bot configuration
pub async fn update_telegram(
    State(state): State<AppState>,
    Json(input): Json<TelegramSettings>,
) -> AppResult<Json<TelegramSettings>> {
    let service = SettingsService::new(state.store);
    let settings = service.update_telegram(input)?;
    Ok(Json(settings))
}

/// Save stock-alert thresholds and channels
pub async fn update_stock_alerts(
    State(state): State<AppState>,
    Json(input): Json<StockAlertSettings>,
) -> AppResult<Json<StockAlertSettings>> {
    let service = SettingsService::new(state.store);
    let settings = service.update_stock_alerts(input)?;
    Ok(Json(settings))
}

/// Save import/export preferences
pub async fn update_import_export(
    State(state): State<AppState>,
    Json(input): Json<ImportExportSettings>,
) -> AppResult<Json<ImportExportSettings>> {
    let service = SettingsService::new(state.store);
    let settings = service.update_import_export(input)?;
    Ok(Json(settings))
}
