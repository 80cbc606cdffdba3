use serde::Serialize;

use super::domain::Severity;

/// User-visible toast raised by the engine after a remote round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// Outbound hook for notifications (toast queue, websocket, log).
pub trait NotificationSink: Send + Sync {
    fn publish(&self, notification: Notification);
}

/// Sink that writes notifications to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn publish(&self, notification: Notification) {
        match notification.severity {
            Severity::Error | Severity::Warning => {
                tracing::warn!(message = %notification.message, "notification")
            }
            _ => tracing::info!(message = %notification.message, "notification"),
        }
    }
}
