use crate::config::types::{Config, PaginationConfig, ServerConfig, UpstreamConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound for `max-pages`
const MAX_PAGES_LIMIT: u32 = 100;

/// Upper bound for `page-delay-ms`
const MAX_PAGE_DELAY_MS: u64 = 10_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_server_config(&config.server)?;
    validate_upstream_config(&config.upstream)?;
    validate_pagination_config(&config.pagination)?;
    Ok(())
}

/// Validates the listening socket configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    if config.address.is_empty() {
        return Err(ConfigError::Validation(
            "server address cannot be empty".to_string(),
        ));
    }

    if config.port == 0 {
        return Err(ConfigError::Validation(
            "server port must be non-zero".to_string(),
        ));
    }

    Ok(())
}

/// Validates the upstream site configuration
fn validate_upstream_config(config: &UpstreamConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' has no host",
            config.base_url
        )));
    }

    if url.path() != "/" || url.query().is_some() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must not have a path or query",
            config.base_url
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates the pagination limits
fn validate_pagination_config(config: &PaginationConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 || config.max_pages > MAX_PAGES_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max-pages must be between 1 and {}, got {}",
            MAX_PAGES_LIMIT, config.max_pages
        )));
    }

    if config.page_delay_ms > MAX_PAGE_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "page-delay-ms must be <= {}ms, got {}ms",
            MAX_PAGE_DELAY_MS, config.page_delay_ms
        )));
    }

    Ok(())
}
