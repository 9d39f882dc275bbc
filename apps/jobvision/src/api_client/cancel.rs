//! Cooperative cancellation for outbound requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Cancellation token shared between a request and whoever may abort it.
///
/// Cloning yields a handle to the same token.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
    }

    /// Resolves once `cancel` has been called. Returns immediately if it
    /// already was.
    pub async fn cancelled(&self) {
        loop {
            // Register before checking the flag so a concurrent cancel is not missed.
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Timer that cancels a token once its deadline passes.
///
/// Dropping the guard disarms the timer, so a request that finishes in time
/// leaves its token untouched.
#[derive(Debug)]
pub struct Deadline {
    timer: JoinHandle<()>,
}

impl Deadline {
    pub fn arm(token: CancellationToken, after: Duration) -> Self {
        let timer = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            tracing::debug!(after_ms = after.as_millis() as u64, "deadline expired; cancelling request");
            token.cancel();
        });
        Self { timer }
    }
}

impl Drop for Deadline {
    fn drop(&mut self) {
        self.timer.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancelled_resolves_after_cancel() {
        let token = CancellationToken::new();
        let waiter = {
            let token = token.clone();
            tokio::spawn(async move { token.cancelled().await })
        };
        token.cancel();
        waiter.await.unwrap();
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_returns_immediately_when_already_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        token.cancelled().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_cancels_after_duration() {
        let token = CancellationToken::new();
        let _deadline = Deadline::arm(token.clone(), Duration::from_secs(10));

        tokio::time::sleep(Duration::from_secs(9)).await;
        assert!(!token.is_cancelled());

        token.cancelled().await;
        assert!(token.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_deadline_never_fires() {
        let token = CancellationToken::new();
        drop(Deadline::arm(token.clone(), Duration::from_secs(1)));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!token.is_cancelled());
    }
}
