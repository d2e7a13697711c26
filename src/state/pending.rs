//! Outstanding-work accounting for completion detection
//!
//! Each crawl task holds a [`WorkGuard`] for its whole lifetime. A child's
//! guard is created by its parent before the parent's own guard is dropped,
//! so the count can only reach zero once the whole task tree has drained.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct PendingInner {
    count: AtomicUsize,
    drained: AtomicBool,
    notify: Notify,
}

/// Shared counter of registered, unfinished crawl tasks
#[derive(Debug, Clone, Default)]
pub struct PendingWork {
    inner: Arc<PendingInner>,
}

/// Registration of one unit of work; deregisters on drop
#[derive(Debug)]
#[must_use = "dropping the guard immediately deregisters the work"]
pub struct WorkGuard {
    inner: Arc<PendingInner>,
}

impl PendingWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one unit of work
    ///
    /// Must be called before the work is spawned.
    pub fn register(&self) -> WorkGuard {
        let previous = self.inner.count.fetch_add(1, Ordering::AcqRel);
        debug_assert!(
            previous > 0 || !self.inner.drained.load(Ordering::Acquire),
            "work registered after the counter drained"
        );
        WorkGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Number of registered tasks that have not finished
    pub fn in_flight(&self) -> usize {
        self.inner.count.load(Ordering::Acquire)
    }

    /// Returns true once the count has returned to zero
    pub fn is_drained(&self) -> bool {
        self.inner.drained.load(Ordering::Acquire)
    }

    /// Waits until every registered task has finished
    pub async fn wait_drained(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_drained() {
                return;
            }
            notified.await;
        }
    }
}

impl Drop for WorkGuard {
    fn drop(&mut self) {
        if self.inner.count.fetch_sub(1, Ordering::AcqRel) == 1 {
            let already = self.inner.drained.swap(true, Ordering::AcqRel);
            debug_assert!(!already, "pending work drained twice");
            tracing::debug!("All crawl tasks finished");
            self.inner.notify.notify_waiters();
        }
    }
}
