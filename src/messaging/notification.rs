// Notification system for surfacing errors in the UI

use std::time::{SystemTime, UNIX_EPOCH};

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// Notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationCategory {
    Audio,
    Generic,
}

/// Notification with timestamp and metadata
#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub category: NotificationCategory,
    pub message: String,
    /// Unix timestamp in milliseconds
    pub timestamp: u64,
}

impl Notification {
    pub fn new(level: NotificationLevel, category: NotificationCategory, message: String) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        Self {
            level,
            category,
            message,
            timestamp,
        }
    }

    pub fn info(category: NotificationCategory, message: String) -> Self {
        Self::new(NotificationLevel::Info, category, message)
    }

    pub fn warning(category: NotificationCategory, message: String) -> Self {
        Self::new(NotificationLevel::Warning, category, message)
    }

    pub fn error(category: NotificationCategory, message: String) -> Self {
        Self::new(NotificationLevel::Error, category, message)
    }

    /// Whether the notification is younger than `max_age_ms`
    pub fn is_recent(&self, max_age_ms: u64) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        now.saturating_sub(self.timestamp) < max_age_ms
    }
}
