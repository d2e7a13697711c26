//! Crawl task dispatch
//!
//! Every claimed URL runs as its own tokio task. A task fetches its URL,
//! emits exactly one [`CrawlResult`], and for HTML pages schedules each
//! extracted link as a new task. Scheduling a candidate goes through three
//! gates in order:
//!
//! 1. The crawl scope (same scheme, host and port as the seed)
//! 2. The visited registry (first claim wins, bounded by the page limit)
//! 3. Pending-work registration, done by the parent before spawning
//!
//! The result stream closes once the last task has finished: each task owns
//! a clone of the result sender and a [`WorkGuard`], and the dispatcher
//! itself keeps no sender after [`Dispatcher::start`] returns.

use crate::config::Config;
use crate::crawler::cancel::CancelSignal;
use crate::crawler::collector::CrawlResult;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::extract_links;
use crate::crawler::scheduler::Scheduler;
use crate::state::{DispatchStats, PendingWork, TaskState, VisitedRegistry, WorkGuard};
use crate::url::{visit_key, CrawlScope};
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::mpsc;
use url::Url;

/// Capacity of the result channel
pub const RESULT_BUFFER: usize = 1000;

/// Log target for verbose page dumps
const FETCH_LOG_TARGET: &str = "linkwalk::fetch";

/// Launches and tracks the tasks of one crawl
pub struct Dispatcher {
    shared: Arc<Shared>,
}

/// State shared by every task of a crawl
struct Shared {
    fetcher: Fetcher,
    scope: CrawlScope,
    registry: VisitedRegistry,
    scheduler: Scheduler,
    pending: PendingWork,
    stats: Arc<DispatchStats>,
    cancel: CancelSignal,
    verbose: bool,
}

/// A claimed URL waiting to be fetched
struct Task {
    url: Url,
    referer: Option<Url>,
    results: mpsc::Sender<CrawlResult>,
    work: WorkGuard,
}

impl Dispatcher {
    /// Creates a dispatcher for a crawl confined to `scope`
    ///
    /// # Arguments
    ///
    /// * `config` - Crawl limits, pacing, and the user agent to send
    /// * `client` - HTTP client shared by every fetch
    /// * `scope` - The seed and the origin the crawl may not leave
    /// * `cancel` - Stops every waiting and in-flight fetch when fired
    pub fn new(config: &Config, client: Client, scope: CrawlScope, cancel: CancelSignal) -> Self {
        let shared = Shared {
            fetcher: Fetcher::new(client, config.http.user_agent.as_str()),
            scope,
            registry: VisitedRegistry::new(config.crawler.claim_limit()),
            scheduler: Scheduler::new(&config.crawler),
            pending: PendingWork::new(),
            stats: Arc::new(DispatchStats::new()),
            cancel,
            verbose: config.crawler.verbose_fetch_logging,
        };

        Self {
            shared: Arc::new(shared),
        }
    }

    /// Schedules the seed and returns the result stream
    ///
    /// The stream yields one result per claimed URL, in completion order,
    /// and closes once every task has finished. Must be called from within
    /// a tokio runtime. The seed can only be claimed once, so a second call
    /// returns a stream that is already closed.
    pub fn start(&self) -> mpsc::Receiver<CrawlResult> {
        let (tx, rx) = mpsc::channel(RESULT_BUFFER);
        let seed = self.shared.scope.seed().clone();

        let state = self.shared.schedule(&tx, seed, None);
        tracing::debug!("Seed {}: {}", self.shared.scope.seed(), state);

        rx
    }

    /// Per-state tally of every candidate seen so far
    pub fn stats(&self) -> Arc<DispatchStats> {
        Arc::clone(&self.shared.stats)
    }

    /// Counter of tasks that have not finished yet
    pub fn pending(&self) -> PendingWork {
        self.shared.pending.clone()
    }

    /// The set of URLs claimed so far
    pub fn registry(&self) -> &VisitedRegistry {
        &self.shared.registry
    }
}

impl Shared {
    /// Runs one candidate through the scheduling gates
    ///
    /// Returns `Dispatched` if a task was spawned for it, or the rejection
    /// that stopped it.
    fn schedule(
        self: &Arc<Self>,
        results: &mpsc::Sender<CrawlResult>,
        candidate: Url,
        referer: Option<&Url>,
    ) -> TaskState {
        if !self.scope.contains(&candidate) {
            tracing::trace!("Skipping out-of-scope link: {}", candidate);
            self.stats.record(TaskState::FilteredOut);
            return TaskState::FilteredOut;
        }

        let url = visit_key(&candidate);
        if !self.registry.try_claim(url.as_str()) {
            tracing::trace!("Skipping already claimed or over-limit link: {}", url);
            self.stats.record(TaskState::ClaimRejected);
            return TaskState::ClaimRejected;
        }
        debug_assert!(self.registry.is_claimed(url.as_str()));

        let task = Task {
            url,
            referer: referer.cloned(),
            results: results.clone(),
            work: self.pending.register(),
        };
        self.stats.record(TaskState::Dispatched);
        tokio::spawn(Arc::clone(self).run_task(task));

        TaskState::Dispatched
    }

    async fn run_task(self: Arc<Self>, task: Task) {
        let Task {
            url,
            referer,
            results,
            work,
        } = task;

        let state = self.process(&url, referer.as_ref(), &results).await;
        debug_assert!(state.is_terminal() && state.is_reported());

        // the stream must be closed by the time the counter drains
        drop(results);
        drop(work);
    }

    /// Moves a task from `from` to `to` and tallies the new state
    fn advance(&self, url: &Url, from: TaskState, to: TaskState) -> TaskState {
        debug_assert!(from.is_active(), "{} left inactive state {}", url, from);
        debug_assert!(
            from.can_transition_to(to),
            "{} made illegal transition {} -> {}",
            url,
            from,
            to
        );
        self.stats.record(to);
        tracing::trace!("{}: {} -> {}", url, from, to);
        to
    }

    /// Fetches one URL and expands it; returns the terminal state reached
    async fn process(
        self: &Arc<Self>,
        url: &Url,
        referer: Option<&Url>,
        results: &mpsc::Sender<CrawlResult>,
    ) -> TaskState {
        let slot = match self.scheduler.wait_turn(&self.cancel).await {
            Ok(slot) => slot,
            Err(e) => {
                emit(results, CrawlResult::failed(url.clone(), e)).await;
                return self.advance(url, TaskState::Dispatched, TaskState::FetchFailedTerminal);
            }
        };

        match self.scheduler.available_slots() {
            Some(free) => tracing::debug!("Fetching {} ({} request slots free)", url, free),
            None => tracing::debug!("Fetching {}", url),
        }
        let response = match self.fetcher.fetch(&self.cancel, url, referer).await {
            Ok(response) => response,
            Err(e) => {
                drop(slot);
                tracing::debug!("Request to {} failed: {}", url, e);
                emit(results, CrawlResult::failed(url.clone(), e)).await;
                return self.advance(url, TaskState::Dispatched, TaskState::FetchFailedTerminal);
            }
        };

        emit(results, CrawlResult::fetched(url.clone(), response.status())).await;
        let state = self.advance(url, TaskState::Dispatched, TaskState::Fetched);

        if !response.is_html() {
            return self.advance(url, state, TaskState::NonHtmlTerminal);
        }

        let page_url = response.final_url().clone();
        let body = match response.read_body(&self.cancel).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to read body of {}: {}", url, e);
                return self.advance(url, state, TaskState::NonHtmlTerminal);
            }
        };
        drop(slot);

        if self.verbose {
            tracing::info!(target: FETCH_LOG_TARGET, "Retrieved HTML for {}:\n{}", url, body);
        }

        let links = extract_links(&body, &page_url);
        let found = links.len();
        let dispatched = links
            .into_iter()
            .map(|link| self.schedule(results, link, Some(&page_url)))
            .filter(|outcome| !outcome.is_rejection())
            .count();

        tracing::debug!(
            "Expanded {}: {} links found, {} new tasks",
            url,
            found,
            dispatched
        );

        self.advance(url, state, TaskState::ParsedAndExpanded)
    }
}

/// Sends a result to the collector
async fn emit(results: &mpsc::Sender<CrawlResult>, result: CrawlResult) {
    if results.send(result).await.is_err() {
        tracing::debug!("Result receiver dropped; discarding result");
    }
}
