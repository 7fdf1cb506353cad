//! Upstream URL templates
//!
//! All URLs are rooted at the configured upstream origin. Seed paths are
//! appended to the origin textually, so a caller can never point the proxy at
//! another host.

use crate::seed::SeedRequest;
use url::Url;

/// Query key used by the upstream for page numbers
const PAGE_KEY: &str = "page";

/// Returns the upstream origin (`scheme://host[:port]`), ignoring any path
pub fn upstream_origin(base: &Url) -> String {
    base.origin().ascii_serialization()
}

/// Builds the absolute URL of a seed page
pub fn seed_url(base: &Url, seed: &SeedRequest) -> Result<Url, url::ParseError> {
    Url::parse(&format!("{}{}", upstream_origin(base), seed.path()))
}

/// Builds the autocomplete URL for a search term
pub fn suggestions_url(base: &Url, term: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(
        &format!("{}/site/autocomplete", upstream_origin(base)),
        &[("term", term)],
    )
}

/// Builds the "related titles" fragment URL for one page
///
/// ```
/// use similar_proxy::seed::related_page_url;
/// use url::Url;
///
/// let base = Url::parse("https://bestsimilar.com").unwrap();
/// let url = related_page_url(&base, "26240", 2).unwrap();
/// assert_eq!(url.as_str(), "https://bestsimilar.com/movies/rel?id=26240&order=0&page=2");
/// ```
pub fn related_page_url(base: &Url, id: &str, page: u32) -> Result<Url, url::ParseError> {
    Url::parse(&format!(
        "{}/movies/rel?id={}&order=0&{}={}",
        upstream_origin(base),
        id,
        PAGE_KEY,
        page
    ))
}

/// Builds the URL of one tag listing page
///
/// Any `page` pair already present on the seed URL is dropped; other query
/// pairs are kept in order.
pub fn tag_page_url(seed: &Url, page: u32) -> Url {
    let retained: Vec<(String, String)> = seed
        .query_pairs()
        .filter(|(key, _)| key != PAGE_KEY)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = seed.clone();
    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        pairs.append_pair(PAGE_KEY, &page.to_string());
    }
    url
}
