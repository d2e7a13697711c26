//! linkwalk main entry point
//!
//! This is the command-line interface for the linkwalk broken link checker.

use anyhow::Context;
use clap::Parser;
use linkwalk::config::{load_config_with_hash, parse_duration, validate, Config};
use linkwalk::crawler::{cancel_pair, crawl, CancelHandle};
use linkwalk::output::{generate_markdown_summary, print_report};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// linkwalk: a same-origin broken link checker
///
/// linkwalk crawls a website starting from START_URL, following links within
/// the same host and scheme, and reports on broken links (HTTP errors and
/// unreachable resources).
#[derive(Parser, Debug)]
#[command(name = "linkwalk")]
#[command(version = "1.0.0")]
#[command(about = "A same-origin broken link checker", long_about = None)]
#[command(after_help = "Example:\n  linkwalk -i -d 2s -t 5s -D -m 100 https://example.com")]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "START_URL")]
    start_url: String,

    /// Ignore invalid (self-signed or expired) TLS certificates
    #[arg(short = 'i', long)]
    ignore_cert: bool,

    /// Add a random delay up to DURATION before each request (e.g. 2s, 500ms, 1m30s)
    #[arg(short = 'd', long, value_name = "DURATION", value_parser = parse_duration)]
    delay: Option<Duration>,

    /// HTTP request timeout (e.g. 5s, 1m30s) [default: 10s]
    #[arg(short = 't', long, value_name = "DURATION", value_parser = parse_duration)]
    timeout: Option<Duration>,

    /// Log the HTML content of every retrieved page
    #[arg(short = 'D', long)]
    debug: bool,

    /// Maximum number of pages to scan (0 = no limit)
    #[arg(short = 'm', long, value_name = "N")]
    max_num: Option<usize>,

    /// Maximum number of requests in flight at once (0 = unbounded)
    #[arg(short = 'c', long, value_name = "N")]
    concurrency: Option<usize>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Also write a markdown summary to FILE
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    tracing::info!(
        "Starting crawl at: {} (ignore cert: {}, delay: {:?}, timeout: {:?}, debug: {}, max-num: {}, concurrency: {})",
        cli.start_url,
        config.http.ignore_certificate_errors,
        config.crawler.max_jitter_delay,
        config.http.request_timeout,
        config.crawler.verbose_fetch_logging,
        config.crawler.max_pages_to_visit,
        config.crawler.max_concurrent_requests
    );

    let (handle, cancel) = cancel_pair();
    spawn_interrupt_handler(handle);

    let report = crawl(&config, &cli.start_url, cancel)
        .await
        .with_context(|| format!("Error initializing crawler for {}", cli.start_url))?;

    print_report(&report).context("Failed to print report")?;

    if let Some(path) = &cli.summary {
        generate_markdown_summary(&report, path)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
    }

    Ok(())
}

/// Loads the optional config file and layers the command-line flags on top
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if cli.ignore_cert {
        config.http.ignore_certificate_errors = true;
    }
    if let Some(delay) = cli.delay {
        config.crawler.max_jitter_delay = delay;
    }
    if let Some(timeout) = cli.timeout {
        config.http.request_timeout = timeout;
    }
    if cli.debug {
        config.crawler.verbose_fetch_logging = true;
    }
    if let Some(max_num) = cli.max_num {
        config.crawler.max_pages_to_visit = max_num;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrent_requests = concurrency;
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Cancels the crawl on Ctrl-C; in-flight requests are reported as broken
fn spawn_interrupt_handler(handle: CancelHandle) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling outstanding requests");
            handle.cancel();
        }
    });
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkwalk=info,warn"),
            1 => EnvFilter::new("linkwalk=debug,info"),
            2 => EnvFilter::new("linkwalk=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
