//! HTTP fetcher implementation
//!
//! This module defines the transport seam the rest of the proxy fetches
//! through, and its reqwest-backed implementation:
//! - Building the shared HTTP client with explicit timeouts
//! - Sending GET requests with a per-endpoint header profile
//! - Returning status and body without interpreting them

use crate::config::UpstreamConfig;
use crate::crawler::headers::RequestHeaders;
use crate::ProxyError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::time::Duration;

/// Raw outcome of one upstream GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// HTTP status code
    pub status: u16,

    /// Response body decoded as text
    pub body: String,
}

impl FetchedPage {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound HTTP seam
///
/// Status codes are data, not errors: implementations return `Err` only when
/// no response was received at all.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch_page(&self, url: &str, headers: &RequestHeaders)
        -> Result<FetchedPage, ProxyError>;
}

/// Builds the shared HTTP client
///
/// # Example
///
/// ```no_run
/// use similar_proxy::config::UpstreamConfig;
/// use similar_proxy::crawler::build_http_client;
///
/// let client = build_http_client(&UpstreamConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UpstreamConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Transport`] backed by a pooled `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, ProxyError> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_page(
        &self,
        url: &str,
        headers: &RequestHeaders,
    ) -> Result<FetchedPage, ProxyError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .headers(to_header_map(headers))
            .send()
            .await
            .map_err(|source| ProxyError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|source| ProxyError::Http {
            url: url.to_string(),
            source,
        })?;

        Ok(FetchedPage { status, body })
    }
}

/// Converts a header profile, dropping pairs reqwest cannot represent
fn to_header_map(headers: &RequestHeaders) -> HeaderMap {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                map.insert(name, value);
            }
            _ => tracing::warn!("Skipping invalid header {}", name),
        }
    }
    map
}
