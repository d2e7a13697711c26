//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `VisitedRegistry`: the set of URLs claimed for crawling, with an optional cap
//! - `PendingWork`: counts unfinished tasks so the crawl knows when it is done
//! - `TaskState`: the states a candidate URL moves through, and their tally

mod pending;
mod registry;
mod task_state;

// Re-export main types
pub use pending::{PendingWork, WorkGuard};
pub use registry::VisitedRegistry;
pub use task_state::{DispatchStats, TaskState};
