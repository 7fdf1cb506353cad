//! Similar-Proxy: a JSON front for a movie/TV recommendation site
//!
//! This crate fetches the upstream site's autocomplete endpoint, title pages,
//! "related titles" fragments and tag listings, scrapes the HTML into title
//! records, and serves the result as a small JSON API.

pub mod config;
pub mod crawler;
pub mod output;
pub mod seed;
pub mod server;

use thiserror::Error;

/// Main error type for Similar-Proxy operations
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Upstream returned status {status} for {url}")]
    UpstreamStatus { url: String, status: u16 },

    #[error("Upstream returned invalid JSON for {url}: {source}")]
    InvalidJson {
        url: String,
        source: serde_json::Error,
    },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Similar-Proxy operations
pub type Result<T> = std::result::Result<T, ProxyError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, Recommendation};
pub use output::{aggregate, AggregateResult, TitleKind, TitleRecord};
pub use seed::{Flow, SeedRequest};
