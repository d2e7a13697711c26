use crate::config::parser::deserialize_duration;
use serde::Deserialize;
use std::time::Duration;

/// Browser-like user agent sent with every request unless overridden
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";

/// Default maximum number of requests in flight at once
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 32;

/// Default HTTP request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Main configuration structure for linkwalk
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Upper bound of the random delay slept before each request (zero disables it)
    #[serde(rename = "max-jitter-delay", deserialize_with = "deserialize_duration")]
    pub max_jitter_delay: Duration,

    /// Maximum number of URLs claimed for crawling (zero means unlimited)
    #[serde(rename = "max-pages-to-visit")]
    pub max_pages_to_visit: usize,

    /// Maximum number of requests in flight at once (zero means unbounded)
    #[serde(rename = "max-concurrent-requests")]
    pub max_concurrent_requests: usize,

    /// Dump the body of every retrieved HTML page
    #[serde(rename = "verbose-fetch-logging")]
    pub verbose_fetch_logging: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_jitter_delay: Duration::ZERO,
            max_pages_to_visit: 0,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            verbose_fetch_logging: false,
        }
    }
}

impl CrawlerConfig {
    /// Returns the claim limit, or None when unlimited
    pub fn claim_limit(&self) -> Option<usize> {
        (self.max_pages_to_visit > 0).then_some(self.max_pages_to_visit)
    }

    /// Returns the jitter bound, or None when jitter is disabled
    pub fn jitter(&self) -> Option<Duration> {
        (!self.max_jitter_delay.is_zero()).then_some(self.max_jitter_delay)
    }

    /// Returns the number of request slots, or None when unbounded
    pub fn request_slots(&self) -> Option<usize> {
        (self.max_concurrent_requests > 0).then_some(self.max_concurrent_requests)
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Accept invalid (self-signed or expired) TLS certificates
    #[serde(rename = "ignore-certificate-errors")]
    pub ignore_certificate_errors: bool,

    /// Timeout for a whole request, body included
    #[serde(rename = "request-timeout", deserialize_with = "deserialize_duration")]
    pub request_timeout: Duration,

    /// User-Agent header value
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            ignore_certificate_errors: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.crawler.claim_limit(), None);
        assert_eq!(config.crawler.jitter(), None);
        assert_eq!(
            config.crawler.request_slots(),
            Some(DEFAULT_MAX_CONCURRENT_REQUESTS)
        );
        assert_eq!(config.http.request_timeout, Duration::from_secs(10));
        assert!(!config.http.ignore_certificate_errors);
    }

    #[test]
    fn test_zero_means_unlimited() {
        let crawler = CrawlerConfig {
            max_pages_to_visit: 0,
            max_concurrent_requests: 0,
            ..CrawlerConfig::default()
        };
        assert_eq!(crawler.claim_limit(), None);
        assert_eq!(crawler.request_slots(), None);
    }

    #[test]
    fn test_positive_limits() {
        let crawler = CrawlerConfig {
            max_jitter_delay: Duration::from_millis(250),
            max_pages_to_visit: 2,
            max_concurrent_requests: 4,
            verbose_fetch_logging: true,
        };
        assert_eq!(crawler.claim_limit(), Some(2));
        assert_eq!(crawler.jitter(), Some(Duration::from_millis(250)));
        assert_eq!(crawler.request_slots(), Some(4));
    }
}
