//! Output module for crawl reports
//!
//! This module handles:
//! - Printing the per-result report and broken-link summary to stdout
//! - Generating markdown summaries of crawl results

mod markdown;
mod report;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use report::{format_report, format_result_line, print_report, write_report};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
