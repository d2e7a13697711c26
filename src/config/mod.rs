//! Configuration module for linkwalk
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Command-line flags are layered on top by the binary.
//!
//! # Example
//!
//! ```no_run
//! use linkwalk::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("linkwalk.toml")).unwrap();
//! println!("Page limit: {:?}", config.crawler.claim_limit());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, HttpConfig, DEFAULT_MAX_CONCURRENT_REQUESTS, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_duration};
pub use validation::validate;
