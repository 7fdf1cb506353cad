//! Request header profiles for the upstream site
//!
//! The upstream rejects requests that do not look like they come from its own
//! pages, and each endpoint expects a different shape: the autocomplete API
//! wants a JSON accept header, title and tag pages want a document request,
//! and the related-titles endpoint wants an XHR issued from the title page.

use crate::seed::upstream_origin;
use url::Url;

/// Browser user agent sent with page and fragment requests
const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/137.0.0.0 Safari/537.36";

/// Browser user agent sent with autocomplete requests
const API_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Ordered list of header name/value pairs for one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHeaders {
    entries: Vec<(&'static str, String)>,
}

impl RequestHeaders {
    fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.entries.push((name, value.into()));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(name, value)| (*name, value.as_str()))
    }

    /// Looks up a header value, ignoring name case
    pub fn get(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Headers for the autocomplete JSON endpoint
pub fn api_headers(base: &Url) -> RequestHeaders {
    let origin = upstream_origin(base);
    RequestHeaders::default()
        .with("User-Agent", API_USER_AGENT)
        .with("Accept", "application/json, text/plain, */*")
        .with("Accept-Language", "en-US,en;q=0.9")
        .with("Referer", format!("{}/", origin))
        .with("Origin", origin)
}

/// Headers for a full HTML document (seed pages and tag listing pages)
pub fn document_headers(base: &Url, referer: &str) -> RequestHeaders {
    RequestHeaders::default()
        .with("User-Agent", DESKTOP_USER_AGENT)
        .with(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        )
        .with("Accept-Language", "en-GB,en;q=0.5")
        .with("Referer", referer)
        .with("Origin", upstream_origin(base))
}

/// Headers for the related-titles XHR issued from a title page
pub fn related_headers(referer: &str) -> RequestHeaders {
    RequestHeaders::default()
        .with("accept", "*/*")
        .with("accept-language", "en-GB,en;q=0.5")
        .with("priority", "u=1, i")
        .with("referer", referer)
        .with(
            "sec-ch-ua",
            r#""Brave";v="137", "Chromium";v="137", "Not/A)Brand";v="24""#,
        )
        .with("sec-ch-ua-mobile", "?0")
        .with("sec-ch-ua-platform", r#""Linux""#)
        .with("sec-fetch-dest", "empty")
        .with("sec-fetch-mode", "cors")
        .with("sec-fetch-site", "same-origin")
        .with("sec-gpc", "1")
        .with("user-agent", DESKTOP_USER_AGENT)
        .with("x-requested-with", "XMLHttpRequest")
}
