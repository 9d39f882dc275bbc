//! Transient user notifications.
//!
//! Only one notification is current at a time: raising a new one replaces the
//! old. A notification stops being current once `NOTIFICATION_TTL` has passed.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::Instant;

pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);
const FEED_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
    Info,
    Success,
}

impl Level {
    fn icon(&self) -> &'static str {
        match self {
            Level::Error => "❌",
            Level::Warning => "⚠️",
            Level::Info => "ℹ️",
            Level::Success => "✅",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    pub raised_at: Instant,
}

impl Notification {
    pub fn is_expired(&self) -> bool {
        self.raised_at.elapsed() >= NOTIFICATION_TTL
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.level.icon(), self.message)
    }
}

/// Shared notification slot plus a broadcast feed for whatever front-end is
/// listening. Cheap to clone.
#[derive(Clone)]
pub struct NotificationCenter {
    current: Arc<Mutex<Option<Notification>>>,
    feed: broadcast::Sender<Notification>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        let (feed, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            current: Arc::new(Mutex::new(None)),
            feed,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.feed.subscribe()
    }

    pub fn notify(&self, level: Level, message: impl Into<String>) {
        let notification = Notification {
            level,
            message: message.into(),
            raised_at: Instant::now(),
        };
        match level {
            Level::Error => tracing::warn!(text = %notification.message, "notification raised"),
            _ => tracing::info!(text = %notification.message, "notification raised"),
        }

        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(notification.clone());
        // No subscribers is fine: the slot still holds it.
        let _ = self.feed.send(notification);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(Level::Error, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.notify(Level::Warning, message);
    }

    /// The live notification, if one was raised less than the TTL ago.
    pub fn current(&self) -> Option<Notification> {
        let mut slot = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(Notification::is_expired) {
            *slot = None;
        }
        slot.clone()
    }

    pub fn dismiss(&self) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
