//! Title records and the aggregate response payload

use serde::Serialize;

/// Whether a title is a film or a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleKind {
    Movie,
    Tv,
}

/// One title scraped from an upstream listing
///
/// `title` and `poster` are never empty; the parser drops items without them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleRecord {
    /// Upstream item id, or a placeholder unique within one response
    pub id: String,

    /// Display title with the year fragment removed
    pub title: String,

    /// Absolute poster URL
    pub poster: String,

    /// Four-digit release year, or empty when the label carries none
    pub year: String,

    #[serde(rename = "type")]
    pub kind: TitleKind,
}

/// Items of one fetched page, in markup order
pub type PageResult = Vec<TitleRecord>;

/// Final JSON payload of the recommendations endpoint
///
/// `total == movie_count + tv_count == items.len()` for every value built by
/// [`aggregate`](crate::output::aggregate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub success: bool,
    pub total: usize,
    pub movie_count: usize,
    pub tv_count: usize,
    pub items: Vec<TitleRecord>,
}
