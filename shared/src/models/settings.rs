//! Settings models
//!
//! Each section maps to one card on the settings screen and is saved as a
//! whole. Email and Telegram settings are stored configuration only; the
//! service never dispatches real messages.

use serde::{Deserialize, Serialize};

use crate::types::{DateFormat, Language, NumberFormat};

/// All persisted settings sections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub user_profile: UserProfile,
    pub locale: LocaleSettings,
    pub email_notifications: EmailNotificationSettings,
    pub telegram: TelegramSettings,
    pub stock_alerts: StockAlertSettings,
    pub import_export: ImportExportSettings,
}

/// Profile of the operating user; `name` attributes history entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub timezone: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "Admin User".to_string(),
            email: "admin@warehouse.com".to_string(),
            role: "Warehouse Manager".to_string(),
            phone: None,
            department: Some("Operations".to_string()),
            timezone: "America/New_York".to_string(),
        }
    }
}

/// Interface language and regional formats
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocaleSettings {
    pub language: Language,
    pub date_format: DateFormat,
    pub number_format: NumberFormat,
}

/// SMTP configuration for e-mail notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailNotificationSettings {
    pub smtp_server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub enable_tls: bool,
    pub test_email: String,
}

impl Default for EmailNotificationSettings {
    fn default() -> Self {
        Self {
            smtp_server: "smtp.gmail.com".to_string(),
            port: 587,
            username: "warehouse@company.com".to_string(),
            password: String::new(),
            enable_tls: true,
            test_email: "admin@company.com".to_string(),
        }
    }
}

/// Telegram bot configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramSettings {
    pub bot_token: String,
    pub chat_id: String,
    pub is_connected: bool,
}

/// How often stock alerts are raised
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AlertFrequency {
    #[default]
    Immediate,
    Hourly,
    Daily,
}

/// Channels a stock alert is delivered over
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertChannels {
    pub email: bool,
    pub telegram: bool,
    pub in_app: bool,
}

impl Default for AlertChannels {
    fn default() -> Self {
        Self {
            email: true,
            telegram: true,
            in_app: true,
        }
    }
}

/// Thresholds driving the critical/low stock views and alerts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAlertSettings {
    pub critical_threshold: i64,
    pub low_threshold: i64,
    pub enable_critical_alerts: bool,
    pub enable_low_stock_alerts: bool,
    pub alert_frequency: AlertFrequency,
    pub channels: AlertChannels,
}

impl Default for StockAlertSettings {
    fn default() -> Self {
        Self {
            critical_threshold: 5,
            low_threshold: 10,
            enable_critical_alerts: true,
            enable_low_stock_alerts: true,
            alert_frequency: AlertFrequency::Immediate,
            channels: AlertChannels::default(),
        }
    }
}

/// Policy applied when an imported article already exists
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateHandling {
    /// Leave the existing product untouched
    #[default]
    Skip,
    /// Merge the row into the existing product
    Update,
    /// Book the row as a new product under a suffixed article code
    Create,
    /// Report the conflict back for manual resolution
    Prompt,
}

/// Import/export preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportExportSettings {
    pub duplicate_handling: DuplicateHandling,
    pub auto_validation: bool,
    pub create_backup: bool,
    /// When false, one invalid row rejects the whole import
    pub allow_partial_import: bool,
    pub date_format: String,
    pub number_format: String,
    pub encoding: String,
}

impl Default for ImportExportSettings {
    fn default() -> Self {
        Self {
            duplicate_handling: DuplicateHandling::Skip,
            auto_validation: true,
            create_backup: true,
            allow_partial_import: true,
            date_format: "auto".to_string(),
            number_format: "auto".to_string(),
            encoding: "utf-8".to_string(),
        }
    }
}
