//! Request pacing for crawl tasks
//!
//! Before every fetch a task:
//! - Sleeps a random jitter in `[0, max_jitter_delay)` when jitter is enabled
//! - Takes one of the global request slots when concurrency is bounded
//!
//! Both waits race against the crawl's cancellation signal.

use crate::config::CrawlerConfig;
use crate::crawler::cancel::CancelSignal;
use crate::crawler::fetcher::FetchError;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Permission to have one request in flight
///
/// The slot is released when this value is dropped.
#[derive(Debug)]
pub struct RequestSlot {
    _permit: Option<OwnedSemaphorePermit>,
}

/// Paces crawl tasks
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Global semaphore for limiting concurrent requests
    slots: Option<Arc<Semaphore>>,

    /// Upper bound of the per-request random delay
    jitter: Option<Duration>,
}

impl Scheduler {
    pub fn new(config: &CrawlerConfig) -> Self {
        Self {
            slots: config
                .request_slots()
                .map(|n| Arc::new(Semaphore::new(n))),
            jitter: config.jitter(),
        }
    }

    /// Waits until the caller may issue its request
    ///
    /// # Returns
    ///
    /// * `Ok(RequestSlot)` - Go ahead; hold the slot until the body is read
    /// * `Err(FetchError::Cancelled)` - The crawl was cancelled while waiting
    pub async fn wait_turn(&self, cancel: &CancelSignal) -> Result<RequestSlot, FetchError> {
        if let Some(max) = self.jitter {
            let delay = draw_jitter(max);
            tracing::trace!("Sleeping {:?} before request", delay);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }

        let Some(semaphore) = &self.slots else {
            return Ok(RequestSlot { _permit: None });
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            permit = semaphore.clone().acquire_owned() => match permit {
                Ok(permit) => Ok(RequestSlot { _permit: Some(permit) }),
                // the semaphore is never closed
                Err(_) => Err(FetchError::Cancelled),
            },
        }
    }

    /// Number of request slots currently free, or None when unbounded
    pub fn available_slots(&self) -> Option<usize> {
        self.slots.as_ref().map(|s| s.available_permits())
    }
}

/// Draws a uniform random delay in `[0, max)`
///
/// The RNG handle lives only inside this function so it is never held
/// across an await point.
fn draw_jitter(max: Duration) -> Duration {
    let nanos = u64::try_from(max.as_nanos()).unwrap_or(u64::MAX);
    if nanos == 0 {
        return Duration::ZERO;
    }
    Duration::from_nanos(rand::thread_rng().gen_range(0..nanos))
}
