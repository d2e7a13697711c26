//! linkwalk: a same-origin broken link crawler
//!
//! This crate crawls every page and asset reachable from a start URL on the
//! same scheme and host, and reports which of them are unreachable or answer
//! with an HTTP error status.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for linkwalk operations
///
/// Only setup-phase failures surface through this type. Anything that goes
/// wrong while fetching a single URL is recorded in that URL's
/// [`crawler::CrawlResult`] instead.
#[derive(Debug, Error)]
pub enum LinkwalkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid duration '{0}'")]
    InvalidDuration(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for linkwalk operations
pub type Result<T> = std::result::Result<T, LinkwalkError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, CrawlResult};
pub use state::{TaskState, VisitedRegistry};
pub use crate::url::{normalize_url, CrawlScope};
