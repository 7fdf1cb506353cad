//! Crawler module for upstream page fetching and processing
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching behind a transport trait
//! - Per-endpoint request header profiles
//! - HTML parsing of title items
//! - Sequential pagination walks
//! - Per-request coordination

mod coordinator;
mod fetcher;
mod headers;
mod parser;
mod walker;

pub use coordinator::{Coordinator, Recommendation};
pub use fetcher::{build_http_client, FetchedPage, HttpTransport, Transport};
pub use headers::{api_headers, document_headers, related_headers, RequestHeaders};
pub use parser::{parse_items, parse_items_with, PlaceholderIds};
pub use walker::{StopReason, WalkPlan, Walker};
