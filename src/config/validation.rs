use crate::config::types::{Config, CrawlerConfig, HttpConfig};
use crate::ConfigError;

/// Highest accepted request slot count
const MAX_CONCURRENT_REQUESTS: usize = 1024;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // zero is "unbounded"
    if config.max_concurrent_requests > MAX_CONCURRENT_REQUESTS {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_requests must be at most {}, got {}",
            MAX_CONCURRENT_REQUESTS, config.max_concurrent_requests
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.request_timeout.is_zero() {
        return Err(ConfigError::Validation(
            "request_timeout must be greater than zero".to_string(),
        ));
    }

    let user_agent = config.user_agent.trim();
    if user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if user_agent.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(format!(
            "user_agent contains control characters: '{}'",
            config.user_agent.escape_debug()
        )));
    }

    Ok(())
}
