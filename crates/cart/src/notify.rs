//! User-facing notifications (toasts).
//!
//! The cart manager reports failed operations through a [`Notifier`]. Sinks
//! are fire-and-forget: nothing a sink does can fail an operation.

use std::sync::Mutex;

use serde::Serialize;
use tokio::sync::broadcast;

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    /// An error toast.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

/// A notification sink.
pub trait Notifier: Send + Sync {
    /// Show `notification` to the user.
    fn notify(&self, notification: Notification);
}

impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Emits notifications as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let Notification { level, message } = notification;
        match level {
            Level::Error => tracing::error!(target: "rocketshoes::toast", %message),
            Level::Warning => tracing::warn!(target: "rocketshoes::toast", %message),
            Level::Info | Level::Success => {
                tracing::info!(target: "rocketshoes::toast", ?level, %message);
            }
        }
    }
}

/// Fans notifications out to UI subscribers.
///
/// Subscribers that fall more than `capacity` notifications behind miss the
/// oldest ones. Notifying with no subscribers drops the notification.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<Notification>,
}

impl BroadcastNotifier {
    /// A notifier buffering up to `capacity` notifications per subscriber.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Receive every notification sent from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(32)
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, notification: Notification) {
        // Err only means nobody is listening.
        let _ = self.sender.send(notification);
    }
}

/// Records notifications in memory.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    received: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    /// An empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far, oldest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .map(|received| received.clone())
            .unwrap_or_default()
    }

    /// Messages received so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|n| n.message)
            .collect()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut received) = self.received.lock() {
            received.push(notification);
        }
    }
}
