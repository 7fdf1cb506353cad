//! Request coordinator
//!
//! Runs one inbound request against the upstream site:
//! - Passing autocomplete suggestions through
//! - Fetching a title seed page, extracting its id and walking related titles
//! - Walking a tag listing from its first page
//! - Aggregating the collected titles

use crate::config::Config;
use crate::crawler::fetcher::{HttpTransport, Transport};
use crate::crawler::headers::{api_headers, document_headers};
use crate::crawler::parser::{parse_items_with, PlaceholderIds};
use crate::crawler::walker::{WalkPlan, Walker};
use crate::output::{aggregate, AggregateResult};
use crate::seed::{extract_id, seed_url, suggestions_url, upstream_origin, Flow, SeedRequest};
use crate::ProxyError;
use serde::de::IgnoredAny;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Outcome of a recommendations request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recommendation {
    /// Titles collected across all pages
    Aggregate(AggregateResult),
    /// Seed page HTML, returned untouched when no title id could be found
    RawHtml(String),
}

/// Per-process entry point for upstream work
///
/// Holds only immutable state, so one instance serves concurrent requests.
pub struct Coordinator {
    transport: Arc<dyn Transport>,
    base_url: Url,
    walker: Walker,
}

impl Coordinator {
    /// Creates a coordinator fetching through the given transport
    pub fn new(config: &Config, transport: Arc<dyn Transport>) -> Result<Self, ProxyError> {
        let base_url = Url::parse(&config.upstream.base_url)?;
        let walker = Walker::new(
            transport.clone(),
            base_url.clone(),
            config.pagination.clone(),
        );

        Ok(Self {
            transport,
            base_url,
            walker,
        })
    }

    /// Creates a coordinator with the reqwest transport
    pub fn from_config(config: &Config) -> Result<Self, ProxyError> {
        let transport = HttpTransport::from_config(&config.upstream)?;
        Self::new(config, Arc::new(transport))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetches autocomplete suggestions for `term`
    ///
    /// The upstream body is returned byte for byte once it is known to be
    /// JSON.
    pub async fn suggestions(&self, term: &str) -> Result<String, ProxyError> {
        let url = suggestions_url(&self.base_url, term)?;
        let page = self
            .transport
            .fetch_page(url.as_str(), &api_headers(&self.base_url))
            .await?;

        if !page.is_success() {
            return Err(ProxyError::UpstreamStatus {
                url: url.to_string(),
                status: page.status,
            });
        }

        serde_json::from_str::<IgnoredAny>(&page.body).map_err(|source| {
            ProxyError::InvalidJson {
                url: url.to_string(),
                source,
            }
        })?;

        Ok(page.body)
    }

    /// Collects the titles listed for a seed path
    ///
    /// # Errors
    ///
    /// Fails only when the title seed page cannot be fetched; pagination
    /// failures end the walk instead.
    pub async fn recommendations(
        &self,
        seed: &SeedRequest,
        cancel: &CancellationToken,
    ) -> Result<Recommendation, ProxyError> {
        let seed_url = seed_url(&self.base_url, seed)?;
        tracing::info!("{:?} flow for {}", seed.flow(), seed_url);

        match seed.flow() {
            Flow::Tag => Ok(self.tag_flow(seed_url, cancel).await),
            Flow::Title => self.title_flow(seed, seed_url, cancel).await,
        }
    }

    async fn tag_flow(&self, seed_url: Url, cancel: &CancellationToken) -> Recommendation {
        let plan = WalkPlan::Tag { seed_url };
        let titles = self
            .walker
            .walk(&plan, &mut PlaceholderIds::new(), cancel)
            .await;

        Recommendation::Aggregate(aggregate(titles))
    }

    async fn title_flow(
        &self,
        seed: &SeedRequest,
        seed_url: Url,
        cancel: &CancellationToken,
    ) -> Result<Recommendation, ProxyError> {
        let referer = format!("{}/", upstream_origin(&self.base_url));
        let page = self
            .transport
            .fetch_page(
                seed_url.as_str(),
                &document_headers(&self.base_url, &referer),
            )
            .await?;

        if !page.is_success() {
            return Err(ProxyError::UpstreamStatus {
                url: seed_url.to_string(),
                status: page.status,
            });
        }

        let Some(id) = extract_id(seed.path(), &page.body) else {
            tracing::warn!(
                "Could not extract title id for {}, returning seed page as is",
                seed.path()
            );
            return Ok(Recommendation::RawHtml(page.body));
        };

        tracing::info!("Extracted title id: {}", id);

        let mut ids = PlaceholderIds::new();
        let mut titles = parse_items_with(&page.body, &self.base_url, &mut ids);
        tracing::info!("First page: {} titles found", titles.len());

        let plan = WalkPlan::Related { id, seed_url };
        titles.extend(self.walker.walk(&plan, &mut ids, cancel).await);

        tracing::info!("Total titles collected: {}", titles.len());

        Ok(Recommendation::Aggregate(aggregate(titles)))
    }
}
