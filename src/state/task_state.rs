/// Task state definitions for tracking crawl progress
///
/// Every candidate URL walks through a small state machine. Rejected
/// candidates stop before they are dispatched and never produce a result;
/// dispatched ones always end in exactly one result-producing terminal state.
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Represents the current state of one candidate URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    // ===== Rejections =====
    /// Different scheme or host than the seed
    FilteredOut,

    /// Already claimed, or the claim limit was reached
    ClaimRejected,

    // ===== Active States =====
    /// Claimed and scheduled as its own task
    Dispatched,

    /// Response headers received
    Fetched,

    // ===== Terminal States =====
    /// HTML page whose links were extracted and scheduled
    ParsedAndExpanded,

    /// Fetched, but not parsed for links
    NonHtmlTerminal,

    /// No response received
    FetchFailedTerminal,
}

impl TaskState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Returns true if the task is still running
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Dispatched | Self::Fetched)
    }

    /// Returns true for the silent rejections that never produce a result
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::FilteredOut | Self::ClaimRejected)
    }

    /// Returns true for terminal states reached after a result was emitted
    pub fn is_reported(&self) -> bool {
        matches!(
            self,
            Self::ParsedAndExpanded | Self::NonHtmlTerminal | Self::FetchFailedTerminal
        )
    }

    /// Checks whether `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        matches!(
            (self, next),
            (Self::Dispatched, Self::Fetched)
                | (Self::Dispatched, Self::FetchFailedTerminal)
                | (Self::Fetched, Self::ParsedAndExpanded)
                | (Self::Fetched, Self::NonHtmlTerminal)
        )
    }

    /// Short lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FilteredOut => "filtered_out",
            Self::ClaimRejected => "claim_rejected",
            Self::Dispatched => "dispatched",
            Self::Fetched => "fetched",
            Self::ParsedAndExpanded => "parsed_and_expanded",
            Self::NonHtmlTerminal => "non_html",
            Self::FetchFailedTerminal => "fetch_failed",
        }
    }

    /// Returns all possible task states
    pub fn all_states() -> [Self; 7] {
        [
            Self::FilteredOut,
            Self::ClaimRejected,
            Self::Dispatched,
            Self::Fetched,
            Self::ParsedAndExpanded,
            Self::NonHtmlTerminal,
            Self::FetchFailedTerminal,
        ]
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lock-free tally of how many candidates reached each state
#[derive(Debug, Default)]
pub struct DispatchStats {
    counts: [AtomicU64; 7],
}

impl DispatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a candidate reached `state`
    pub fn record(&self, state: TaskState) {
        self.counts[state.index()].fetch_add(1, Ordering::Relaxed);
    }

    /// Number of candidates that reached `state`
    pub fn count(&self, state: TaskState) -> u64 {
        self.counts[state.index()].load(Ordering::Relaxed)
    }

    /// Number of candidates rejected without a result
    pub fn rejected(&self) -> u64 {
        self.count(TaskState::FilteredOut) + self.count(TaskState::ClaimRejected)
    }
}
