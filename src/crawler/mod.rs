//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with browser-like headers
//! - HTML parsing and link extraction
//! - Request pacing (jitter and a global concurrency bound)
//! - Recursive task dispatch and result collection

mod cancel;
mod collector;
mod dispatcher;
mod fetcher;
mod parser;
mod scheduler;

pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use collector::{collect, CrawlReport, CrawlResult};
pub use dispatcher::{Dispatcher, RESULT_BUFFER};
pub use fetcher::{build_http_client, is_html_content_type, FetchError, FetchedResponse, Fetcher};
pub use parser::extract_links;
pub use scheduler::{RequestSlot, Scheduler};

use crate::config::Config;
use crate::state::TaskState;
use crate::url::CrawlScope;
use crate::LinkwalkError;
use chrono::Utc;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Parse the seed and derive the crawl scope
/// 2. Build the HTTP client
/// 3. Dispatch the seed and every in-scope link it leads to
/// 4. Collect one result per claimed URL until every task has finished
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - The start URL
/// * `cancel` - Cancels the crawl when fired; the report is still returned
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The crawl ran to completion (broken links or not)
/// * `Err(LinkwalkError)` - Setup failed: bad seed URL or HTTP client
pub async fn crawl(
    config: &Config,
    seed: &str,
    cancel: CancelSignal,
) -> Result<CrawlReport, LinkwalkError> {
    let scope = CrawlScope::from_seed(seed)?;
    let client = build_http_client(&config.http)?;

    tracing::info!("Starting crawl of {}", scope.seed());
    let started_at = Utc::now();

    let dispatcher = Dispatcher::new(config, client, scope.clone(), cancel);
    let rx = dispatcher.start();
    let report = collect(scope.seed().clone(), started_at, rx).await;
    // the stream closes just before the last task's guard drops
    dispatcher.pending().wait_drained().await;

    let stats = dispatcher.stats();
    tracing::info!(
        "Crawl finished in {:.2}s: {} URLs checked, {} broken, {} links skipped",
        report.duration().num_milliseconds() as f64 / 1000.0,
        report.total(),
        report.broken_count(),
        stats.rejected()
    );
    for state in TaskState::all_states() {
        tracing::debug!("  {}: {}", state, stats.count(state));
    }

    Ok(report)
}
