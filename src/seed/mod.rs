//! Seed request handling for Similar-Proxy
//!
//! This module classifies the caller-supplied path into a pagination flow,
//! builds the upstream URLs for each flow, and extracts the numeric title
//! identifier that drives the "related titles" flow.

mod identifier;
mod urls;

pub use identifier::extract_id;
pub use urls::{related_page_url, seed_url, suggestions_url, tag_page_url, upstream_origin};

/// Marker that routes a seed path to the tag listing flow
const TAG_MARKER: &str = "/tag/";

/// Pagination strategy selected for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flow {
    /// Movie or show page; paginates the "related titles" endpoint by id
    Title,
    /// Tag listing page; paginates the same path with a `page` query
    Tag,
}

impl Flow {
    /// Returns the flow for a seed path
    ///
    /// Any path containing `/tag/` is a tag listing, everything else is a
    /// title page.
    pub fn classify(path: &str) -> Self {
        if path.contains(TAG_MARKER) {
            Self::Tag
        } else {
            Self::Title
        }
    }

    /// First page number fetched by the pagination walk
    ///
    /// The title flow has already consumed page 1 as its seed page.
    pub fn start_page(&self) -> u32 {
        match self {
            Self::Title => 2,
            Self::Tag => 1,
        }
    }
}

/// A caller-supplied relative path, classified once at entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRequest {
    path: String,
    flow: Flow,
}

impl SeedRequest {
    /// Classifies a relative path such as `/movies/26240-game-of-thrones`
    ///
    /// # Examples
    ///
    /// ```
    /// use similar_proxy::seed::{Flow, SeedRequest};
    ///
    /// let seed = SeedRequest::new("/tag/3853-incest");
    /// assert_eq!(seed.flow(), Flow::Tag);
    /// ```
    pub fn new(path: &str) -> Self {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        let flow = Flow::classify(&path);
        Self { path, flow }
    }

    /// The relative path, always starting with `/`
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }
}
