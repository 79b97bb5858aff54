//! Validation utilities for the Warehouse Ledger Service
//!
//! Shared between the backend services and the browser forms (via WASM).

use chrono::NaiveDate;
use rust_decimal::Decimal;

// ============================================================================
// Ledger Validations
// ============================================================================

/// Validate an article code (3-20 uppercase alphanumeric, dashes allowed)
pub fn validate_article_code(code: &str) -> Result<(), &'static str> {
    if code.len() < 3 {
        return Err("Article code must be at least 3 characters");
    }
    if code.len() > 20 {
        return Err("Article code must be at most 20 characters");
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
    {
        return Err("Article code must be uppercase alphanumeric with dashes");
    }
    if code.starts_with('-') || code.ends_with('-') {
        return Err("Article code cannot start or end with a dash");
    }
    Ok(())
}

/// Validate a movement quantity (receipts, allocations, reserve items)
pub fn validate_positive_quantity(quantity: i64) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate a counted stock figure (audits allow zero)
pub fn validate_counted_stock(quantity: i64) -> Result<(), &'static str> {
    if quantity < 0 {
        return Err("Counted stock cannot be negative");
    }
    Ok(())
}

/// Validate a cost price
pub fn validate_cost_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Cost price cannot be negative");
    }
    Ok(())
}

/// Validate a reservation date against the current date
pub fn validate_reservation_date(date: NaiveDate, today: NaiveDate) -> Result<(), &'static str> {
    if date < today {
        return Err("Reservation date cannot be in the past");
    }
    Ok(())
}

/// Check whether a remaining-stock figure counts as critical
pub fn is_critical_stock(remaining: i64, critical_threshold: i64) -> bool {
    remaining <= critical_threshold
}

/// Check whether a remaining-stock figure counts as low (critical included)
pub fn is_low_stock(remaining: i64, low_threshold: i64) -> bool {
    remaining <= low_threshold
}

// ============================================================================
// Settings Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate the stock-alert threshold pair
pub fn validate_alert_thresholds(critical: i64, low: i64) -> Result<(), &'static str> {
    if critical < 0 || low < 0 {
        return Err("Thresholds cannot be negative");
    }
    if critical > low {
        return Err("Critical threshold cannot exceed the low-stock threshold");
    }
    Ok(())
}

/// Validate a Telegram bot token (digits, colon, secret part)
pub fn validate_telegram_bot_token(token: &str) -> Result<(), &'static str> {
    let Some((id, secret)) = token.split_once(':') else {
        return Err("Bot token must be in format <bot id>:<secret>");
    };
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return Err("Bot id part must be numeric");
    }
    if secret.len() < 10 {
        return Err("Bot token secret part is too short");
    }
    Ok(())
}
