use serde::Deserialize;

/// Main configuration structure for Similar-Proxy
///
/// Every section is optional; a missing section or key falls back to the
/// defaults the proxy ships with.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// Listening socket configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to
    #[serde(default = "default_address")]
    pub address: String,

    /// TCP port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
        }
    }
}

/// Upstream site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Origin of the upstream site; seed paths are appended to it
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Total timeout for one outbound request (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Connect timeout for one outbound request (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

/// Pagination walk limits
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    /// Highest page number a walk will request
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Pause between two page fetches (milliseconds)
    #[serde(rename = "page-delay-ms", default = "default_page_delay")]
    pub page_delay_ms: u64,

    /// Bodies shorter than this many bytes count as empty pages
    #[serde(rename = "min-page-bytes", default = "default_min_page_bytes")]
    pub min_page_bytes: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            page_delay_ms: default_page_delay(),
            min_page_bytes: default_min_page_bytes(),
        }
    }
}

fn default_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_base_url() -> String {
    "https://bestsimilar.com".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_max_pages() -> u32 {
    20
}

fn default_page_delay() -> u64 {
    100
}

fn default_min_page_bytes() -> usize {
    100
}
