//! Visited registry
//!
//! Records which normalized URLs have been claimed for crawling. The claim
//! check and the insert happen under one lock, so two tasks racing on the
//! same URL can never both win.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Thread-safe set of claimed URLs with an optional cap on total claims
#[derive(Debug)]
pub struct VisitedRegistry {
    inner: Mutex<HashSet<String>>,
    limit: Option<usize>,
}

impl VisitedRegistry {
    /// Creates an empty registry
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of successful claims; `None` or `Some(0)`
    ///   means unlimited
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            inner: Mutex::new(HashSet::new()),
            limit: limit.filter(|&n| n > 0),
        }
    }

    /// Claims `url` for crawling
    ///
    /// # Returns
    ///
    /// * `true` - The URL was never claimed before and the limit was not
    ///   reached; it is now recorded
    /// * `false` - Already claimed, or the claim limit was reached
    pub fn try_claim(&self, url: &str) -> bool {
        // the critical section is O(1) and never panics, so a poisoned
        // lock still holds a consistent set
        let mut claimed = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(limit) = self.limit {
            if claimed.len() >= limit {
                return false;
            }
        }

        if claimed.contains(url) {
            return false;
        }

        claimed.insert(url.to_string())
    }

    /// Returns true if `url` has been claimed
    pub fn is_claimed(&self, url: &str) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(url)
    }

    /// Number of successful claims so far
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The claim limit, if any
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}
