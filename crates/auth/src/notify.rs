//! User-facing notifications (toast boundary).

use std::sync::Mutex;

/// Outcome category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// Sink for transient user-facing notifications.
///
/// Every auth operation emits exactly one notification per outcome category.
/// Redirects stay silent; a redirect compounded with a toast is noise.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Notifier that logs via tracing; stands in for the UI toast layer.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(target: "rumoerp::notify", message, "notify.success");
    }

    fn error(&self, message: &str) {
        tracing::warn!(target: "rumoerp::notify", message, "notify.error");
    }
}

/// Recording notifier for tests.
#[derive(Default)]
pub struct RecordingNotifier {
    entries: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn count(&self, kind: NotificationKind) -> usize {
        self.entries().iter().filter(|n| n.kind == kind).count()
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Notification {
                kind: NotificationKind::Success,
                message: message.to_string(),
            });
    }

    fn error(&self, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Notification {
                kind: NotificationKind::Error,
                message: message.to_string(),
            });
    }
}
