//! Parse notification / diagnostic system.
//!
//! Non-fatal conditions encountered while decoding (a scan line with no
//! stored data, direction flags that could not be derived) are collected as
//! `Notification` items on the parsed [`FileStructure`] rather than being
//! silently dropped or causing hard errors.
//!
//! [`FileStructure`]: crate::document::FileStructure

use std::fmt;

/// Severity level of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// A declared part of the grid has no stored data (e.g. a zero-pointer
    /// scan line).
    MissingData,
    /// Non-fatal warning (e.g., a flag that could not be derived).
    Warning,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingData => write!(f, "MissingData"),
            Self::Warning => write!(f, "Warning"),
        }
    }
}

/// A single notification produced while decoding a file.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// The severity / category.
    pub notification_type: NotificationType,
    /// A human-readable description of the issue.
    pub message: String,
}

impl Notification {
    /// Create a new notification.
    pub fn new(notification_type: NotificationType, message: impl Into<String>) -> Self {
        Self {
            notification_type,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.notification_type, self.message)
    }
}
