//! Pagination walker
//!
//! Walks the numbered result pages of one listing strictly in order. Pages are
//! produced as a lazy stream that ends on the first stop signal; the walk
//! itself is that stream concatenated. A page that cannot be fetched is not an
//! error here: the upstream answers past-the-end pages with 404s, empty bodies
//! or empty listings, and a broken page is indistinguishable from those, so
//! every failure simply ends the walk with what was gathered.

use crate::config::PaginationConfig;
use crate::crawler::fetcher::{FetchedPage, Transport};
use crate::crawler::headers::{document_headers, related_headers, RequestHeaders};
use crate::crawler::parser::{parse_items_with, PlaceholderIds};
use crate::output::{PageResult, TitleRecord};
use crate::seed::{related_page_url, tag_page_url, Flow};
use futures::stream::{self, Stream, StreamExt};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Which listing a walk paginates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkPlan {
    /// "Related titles" fragments of the title with this id
    Related { id: String, seed_url: Url },
    /// Numbered pages of a tag listing
    Tag { seed_url: Url },
}

impl WalkPlan {
    pub fn flow(&self) -> Flow {
        match self {
            Self::Related { .. } => Flow::Title,
            Self::Tag { .. } => Flow::Tag,
        }
    }

    /// URL of the given page number
    pub fn page_url(&self, base_url: &Url, page: u32) -> Result<Url, url::ParseError> {
        match self {
            Self::Related { id, .. } => related_page_url(base_url, id, page),
            Self::Tag { seed_url } => Ok(tag_page_url(seed_url, page)),
        }
    }

    /// Header profile the upstream expects for this listing
    pub fn headers(&self, base_url: &Url) -> RequestHeaders {
        match self {
            Self::Related { seed_url, .. } => related_headers(seed_url.as_str()),
            Self::Tag { seed_url } => document_headers(base_url, seed_url.as_str()),
        }
    }
}

/// Why a walk ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Page answered 404
    NotFound,
    /// Page answered another non-2xx status
    Status(u16),
    /// Body blank or shorter than the minimum page size
    EmptyBody(usize),
    /// Body parsed to zero items
    NoItems,
    /// No response was received
    Transport(String),
    /// Page URL could not be built
    InvalidUrl(String),
    /// Configured page limit reached
    PageLimit,
    /// Caller went away
    Cancelled,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "returned 404"),
            Self::Status(status) => write!(f, "failed with status {}", status),
            Self::EmptyBody(len) => write!(f, "appears to be empty ({} bytes)", len),
            Self::NoItems => write!(f, "has no titles"),
            Self::Transport(e) => write!(f, "could not be fetched: {}", e),
            Self::InvalidUrl(e) => write!(f, "has an invalid URL: {}", e),
            Self::PageLimit => write!(f, "is past the page limit"),
            Self::Cancelled => write!(f, "was cancelled"),
        }
    }
}

/// Sequential page walker over a [`Transport`]
pub struct Walker {
    transport: Arc<dyn Transport>,
    base_url: Url,
    limits: PaginationConfig,
}

impl Walker {
    pub fn new(transport: Arc<dyn Transport>, base_url: Url, limits: PaginationConfig) -> Self {
        Self {
            transport,
            base_url,
            limits,
        }
    }

    /// Walks the listing and returns all titles, pages in ascending order
    ///
    /// `ids` supplies placeholder ids and is shared with any page the caller
    /// parsed before the walk.
    pub async fn walk(
        &self,
        plan: &WalkPlan,
        ids: &mut PlaceholderIds,
        cancel: &CancellationToken,
    ) -> Vec<TitleRecord> {
        let pages: Vec<PageResult> = self.pages(plan, ids, cancel).collect().await;
        let titles: Vec<TitleRecord> = pages.into_iter().flatten().collect();

        tracing::info!(
            "{:?} walk collected {} titles starting at page {}",
            plan.flow(),
            titles.len(),
            plan.flow().start_page()
        );

        titles
    }

    /// Lazy stream of non-empty pages, ending at the first stop signal
    pub fn pages<'a>(
        &'a self,
        plan: &'a WalkPlan,
        ids: &'a mut PlaceholderIds,
        cancel: &'a CancellationToken,
    ) -> impl Stream<Item = PageResult> + Send + 'a {
        let start = plan.flow().start_page();

        stream::unfold((start, ids), move |(page, ids)| async move {
            match self.next_page(plan, page, start, ids, cancel).await {
                Ok(items) => {
                    tracing::info!("Page {}: {} titles found", page, items.len());
                    Some((items, (page + 1, ids)))
                }
                Err(reason) => {
                    tracing::info!("Page {} {}, stopping pagination", page, reason);
                    None
                }
            }
        })
    }

    /// Fetches and parses one page, or says why the walk stops there
    async fn next_page(
        &self,
        plan: &WalkPlan,
        page: u32,
        start: u32,
        ids: &mut PlaceholderIds,
        cancel: &CancellationToken,
    ) -> Result<PageResult, StopReason> {
        if page > self.limits.max_pages {
            return Err(StopReason::PageLimit);
        }

        if page > start {
            self.pause(cancel).await?;
        }

        let url = plan
            .page_url(&self.base_url, page)
            .map_err(|e| StopReason::InvalidUrl(e.to_string()))?;
        let headers = plan.headers(&self.base_url);

        tracing::debug!("Fetching page {}: {}", page, url);

        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(StopReason::Cancelled),
            result = self.transport.fetch_page(url.as_str(), &headers) => {
                result.map_err(|e| StopReason::Transport(e.to_string()))?
            }
        };

        self.check_page(&fetched)?;

        let items = parse_items_with(&fetched.body, &self.base_url, ids);
        if items.is_empty() {
            return Err(StopReason::NoItems);
        }

        Ok(items)
    }

    /// Applies the status and size stop conditions
    fn check_page(&self, page: &FetchedPage) -> Result<(), StopReason> {
        if page.status == 404 {
            return Err(StopReason::NotFound);
        }

        if !page.is_success() {
            return Err(StopReason::Status(page.status));
        }

        if page.body.trim().is_empty() || page.body.len() < self.limits.min_page_bytes {
            return Err(StopReason::EmptyBody(page.body.len()));
        }

        Ok(())
    }

    /// Courtesy delay between two page fetches
    async fn pause(&self, cancel: &CancellationToken) -> Result<(), StopReason> {
        let delay = Duration::from_millis(self.limits.page_delay_ms);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(StopReason::Cancelled),
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }
}
