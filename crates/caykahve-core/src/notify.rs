//! User-visible notification channel.
//!
//! The channel holds a single most-recent message; each new notification
//! replaces the previous one. There is no queue.

use std::sync::Mutex;
use std::time::Duration;

use serde::Serialize;

pub const INFO_DURATION: Duration = Duration::from_secs(3);
pub const ERROR_DURATION: Duration = Duration::from_secs(6);
pub const GREETING_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    /// How long the message stays visible before auto-dismissing.
    pub duration: Duration,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Info,
            duration: INFO_DURATION,
        }
    }

    /// Error messages are shown as `Error: <detail>`.
    pub fn error(detail: impl std::fmt::Display) -> Self {
        Self {
            message: format!("Error: {detail}"),
            kind: NotificationKind::Error,
            duration: ERROR_DURATION,
        }
    }

    #[must_use]
    pub fn greeting() -> Self {
        Self {
            message: "Tea or coffee? Pick one to find places near you.".to_string(),
            kind: NotificationKind::Info,
            duration: GREETING_DURATION,
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Keeps only the most recent notification.
#[derive(Debug, Default)]
pub struct LatestNotification {
    slot: Mutex<Option<Notification>>,
}

impl LatestNotification {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn latest(&self) -> Option<Notification> {
        self.slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for LatestNotification {
    fn notify(&self, notification: Notification) {
        *self
            .slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(notification);
    }
}
