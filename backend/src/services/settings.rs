//! Settings service
//!
//! Sections are saved whole with required-field checks only. Email and
//! Telegram configuration is stored, never dispatched.

use shared::models::{
    EmailNotificationSettings, ImportExportSettings, LocaleSettings, Settings, StockAlertSettings,
    TelegramSettings, UserProfile,
};
use shared::validation::{validate_alert_thresholds, validate_email, validate_telegram_bot_token};

use crate::error::{AppError, AppResult};
use crate::store::Store;

/// Settings service
#[derive(Clone)]
pub struct SettingsService {
    store: Store,
}

impl SettingsService {
    /// Create a new SettingsService instance
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// All sections
    pub fn get(&self) -> Settings {
        self.store.read().settings.clone()
    }

    /// Save the user profile
    pub fn update_profile(&self, profile: UserProfile) -> AppResult<UserProfile> {
        if profile.name.trim().is_empty() {
            return Err(AppError::validation("name", "Name is required"));
        }
        validate_email(&profile.email).map_err(|e| AppError::validation("email", e))?;

        let mut state = self.store.write();
        state.settings.user_profile = profile.clone();
        Ok(profile)
    }

    /// Save language and regional formats
    pub fn update_locale(&self, locale: LocaleSettings) -> AppResult<LocaleSettings> {
        let mut state = self.store.write();
        state.settings.locale = locale.clone();
        Ok(locale)
    }

    /// Save the SMTP configuration
    pub fn update_email_notifications(
        &self,
        settings: EmailNotificationSettings,
    ) -> AppResult<EmailNotificationSettings> {
        if settings.smtp_server.trim().is_empty() {
            return Err(AppError::validation(
                "smtp_server",
                "SMTP server is required",
            ));
        }
        if settings.username.trim().is_empty() {
            return Err(AppError::validation("username", "Username is required"));
        }
        if !settings.test_email.is_empty() {
            validate_email(&settings.test_email)
                .map_err(|e| AppError::validation("test_email", e))?;
        }

        let mut state = self.store.write();
        state.settings.email_notifications = settings.clone();
        Ok(settings)
    }

    /// Save the Telegram bot configuration
    ///
    /// Token and chat id are required together; a complete pair marks the
    /// integration as connected (no real API call is made).
    pub fn update_telegram(&self, mut settings: TelegramSettings) -> AppResult<TelegramSettings> {
        let has_token = !settings.bot_token.trim().is_empty();
        let has_chat = !settings.chat_id.trim().is_empty();
        if has_token != has_chat {
            return Err(AppError::validation(
                "telegram",
                "Bot token and chat id are required together",
            ));
        }
        if has_token {
            validate_telegram_bot_token(&settings.bot_token)
                .map_err(|e| AppError::validation("bot_token", e))?;
        }
        settings.is_connected = has_token && has_chat;

        let mut state = self.store.write();
        state.settings.telegram = settings.clone();
        Ok(settings)
    }

    /// Save stock-alert thresholds and channels
    pub fn update_stock_alerts(
        &self,
        settings: StockAlertSettings,
    ) -> AppResult<StockAlertSettings> {
        validate_alert_thresholds(settings.critical_threshold, settings.low_threshold)
            .map_err(|e| AppError::validation("thresholds", e))?;

        let mut state = self.store.write();
        state.settings.stock_alerts = settings.clone();
        Ok(settings)
    }

    /// Save import/export preferences
    pub fn update_import_export(
        &self,
        settings: ImportExportSettings,
    ) -> AppResult<ImportExportSettings> {
        let mut state = self.store.write();
        state.settings.import_export = settings.clone();
        Ok(settings)
    }
}
