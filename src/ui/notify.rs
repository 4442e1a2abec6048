//! Transient notifications.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::NotificationConfig;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// Accepts a message for display to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// A notification currently on screen.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub shown_at: Instant,
}

/// Keeps notifications until their display interval elapses.
pub struct NotificationCenter {
    dismiss_after: Duration,
    next_id: AtomicU64,
    active: Mutex<Vec<Notification>>,
}

impl NotificationCenter {
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            dismiss_after,
            next_id: AtomicU64::new(1),
            active: Mutex::new(Vec::new()),
        }
    }

    pub fn from_config(config: &NotificationConfig) -> Self {
        Self::new(Duration::from_millis(config.dismiss_after_ms))
    }

    /// Notifications still visible now. Expired ones are dropped.
    pub fn active(&self) -> Vec<Notification> {
        let now = Instant::now();
        let mut active = self.active.lock().expect("notification mutex poisoned");
        active.retain(|n| now.duration_since(n.shown_at) < self.dismiss_after);
        active.clone()
    }

    /// Remove a notification before its interval elapses.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut active = self.active.lock().expect("notification mutex poisoned");
        let before = active.len();
        active.retain(|n| n.id != id);
        active.len() != before
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, message: &str, severity: Severity) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(id, severity = %severity, text = message, "Notification shown");
        self.active
            .lock()
            .expect("notification mutex poisoned")
            .push(Notification {
                id,
                message: message.to_string(),
                severity,
                shown_at: Instant::now(),
            });
    }
}

/// Writes notifications to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        eprintln!("[{}] {}", severity, message);
    }
}
