//! Result collection and broken-link classification

use crate::crawler::fetcher::FetchError;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use url::Url;

/// How often the collector logs its progress, in results
const PROGRESS_INTERVAL: usize = 25;

/// Outcome of fetching one claimed URL
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlResult {
    /// The URL that was requested (fragment removed)
    pub url: Url,

    /// HTTP status of the response, 0 when none arrived
    pub status: u16,

    /// Why no response arrived, if that is the case
    pub error: Option<FetchError>,
}

impl CrawlResult {
    /// A response arrived with `status`
    pub fn fetched(url: Url, status: u16) -> Self {
        Self {
            url,
            status,
            error: None,
        }
    }

    /// No response arrived
    pub fn failed(url: Url, error: FetchError) -> Self {
        Self {
            url,
            status: error.status(),
            error: Some(error),
        }
    }

    /// Returns true if this result is a broken link
    ///
    /// A link is broken when the request failed outright or the server
    /// answered with a 4xx or 5xx status.
    pub fn is_broken(&self) -> bool {
        self.error.is_some() || (400..600).contains(&self.status)
    }
}

/// Every result of one crawl, in arrival order
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub seed: Url,
    pub results: Vec<CrawlResult>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Broken results, in arrival order
    pub fn broken(&self) -> impl Iterator<Item = &CrawlResult> {
        self.results.iter().filter(|r| r.is_broken())
    }

    pub fn broken_count(&self) -> usize {
        self.broken().count()
    }

    pub fn ok_count(&self) -> usize {
        self.total() - self.broken_count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Wall-clock time between the start and end of the crawl
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Drains the result stream until it closes
///
/// `started_at` marks the start of the crawl; the finish time is taken when
/// the stream closes.
pub async fn collect(
    seed: Url,
    started_at: DateTime<Utc>,
    mut rx: mpsc::Receiver<CrawlResult>,
) -> CrawlReport {
    let mut results = Vec::new();
    let mut broken = 0usize;

    while let Some(result) = rx.recv().await {
        if result.is_broken() {
            broken += 1;
        }
        results.push(result);

        if results.len() % PROGRESS_INTERVAL == 0 {
            tracing::info!(
                "Progress: {} URLs checked, {} broken so far",
                results.len(),
                broken
            );
        }
    }

    CrawlReport {
        seed,
        results,
        started_at,
        finished_at: Utc::now(),
    }
}
