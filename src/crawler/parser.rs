//! HTML parser for extracting title items
//!
//! Title pages, related-title fragments and tag listings all render each
//! title as the same block:
//!
//! ```html
//! <div class="column">
//!   <div class="column-img"><img src="/img/1.jpg" alt="Title (2011)" data-id="1"></div>
//!   <span class="label label-default">TV show</span>
//! </div>
//! ```
//!
//! Every field of a record is read from elements whose nearest `column`
//! ancestor is that record's container, so markers never leak between
//! neighbouring or nested blocks.

use crate::output::{PageResult, TitleKind, TitleRecord};
use crate::seed::upstream_origin;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use url::Url;

/// Class carried by every item container
const CONTAINER_CLASS: &str = "column";

/// Badge text marking a series
const TV_MARKER: &str = "TV show";

static YEAR: OnceLock<Regex> = OnceLock::new();
static YEAR_FRAGMENT: OnceLock<Regex> = OnceLock::new();

fn year_re() -> &'static Regex {
    YEAR.get_or_init(|| Regex::new(r"\((\d{4})\)").unwrap())
}

fn year_fragment_re() -> &'static Regex {
    YEAR_FRAGMENT.get_or_init(|| Regex::new(r"\s*\(\d{4}\)").unwrap())
}

/// Generator for ids of items the upstream gives no id
///
/// Yields `local-1`, `local-2`, ... Share one instance across all pages of a
/// response to keep the placeholders unique within it.
#[derive(Debug, Default)]
pub struct PlaceholderIds {
    issued: u32,
}

impl PlaceholderIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> String {
        self.issued += 1;
        format!("local-{}", self.issued)
    }
}

struct ItemSelectors {
    container: Selector,
    poster: Selector,
    badge: Selector,
}

impl ItemSelectors {
    fn new() -> Option<Self> {
        Some(Self {
            container: Selector::parse(".column").ok()?,
            poster: Selector::parse(".column-img img").ok()?,
            badge: Selector::parse(".label.label-default").ok()?,
        })
    }
}

/// Parses the title items of one page with a fresh placeholder sequence
///
/// # Example
///
/// ```
/// use similar_proxy::crawler::parse_items;
/// use similar_proxy::TitleKind;
/// use url::Url;
///
/// let html = r#"<div class="column">
///     <div class="column-img"><img src="/img/1.jpg" alt="Show X (1999)"></div>
///     <span class="label label-default">TV show</span>
/// </div>"#;
/// let base = Url::parse("https://bestsimilar.com").unwrap();
/// let items = parse_items(html, &base);
/// assert_eq!(items[0].title, "Show X");
/// assert_eq!(items[0].year, "1999");
/// assert_eq!(items[0].kind, TitleKind::Tv);
/// ```
pub fn parse_items(html: &str, base_url: &Url) -> PageResult {
    parse_items_with(html, base_url, &mut PlaceholderIds::new())
}

/// Parses the title items of one page
///
/// Containers without a poster `src` or a label `alt` are skipped. Empty or
/// malformed markup yields an empty page.
pub fn parse_items_with(html: &str, base_url: &Url, ids: &mut PlaceholderIds) -> PageResult {
    let Some(selectors) = ItemSelectors::new() else {
        return Vec::new();
    };
    let document = Html::parse_document(html);

    document
        .select(&selectors.container)
        .filter_map(|container| parse_container(container, &selectors, base_url, ids))
        .collect()
}

/// Builds the record for one container, or `None` if it lacks poster or label
fn parse_container(
    container: ElementRef<'_>,
    selectors: &ItemSelectors,
    base_url: &Url,
    ids: &mut PlaceholderIds,
) -> Option<TitleRecord> {
    let image = container
        .select(&selectors.poster)
        .find(|img| belongs_to(*img, container))?;

    let src = non_empty_attr(image, "src")?;
    let label = non_empty_attr(image, "alt")?;

    let (title, year) = split_label(label);
    if title.is_empty() {
        return None;
    }

    let is_tv = container
        .select(&selectors.badge)
        .filter(|badge| belongs_to(*badge, container))
        .any(|badge| badge.text().collect::<String>().contains(TV_MARKER));

    let id = non_empty_attr(image, "data-id")
        .or_else(|| non_empty_attr(container, "data-id"))
        .map(str::to_string)
        .unwrap_or_else(|| ids.next_id());

    Some(TitleRecord {
        id,
        title,
        poster: absolute_poster(src, base_url),
        year,
        kind: if is_tv { TitleKind::Tv } else { TitleKind::Movie },
    })
}

/// Returns true if `container` is the nearest item container above `element`
fn belongs_to(element: ElementRef<'_>, container: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().classes().any(|c| c == CONTAINER_CLASS))
        .is_some_and(|owner| owner == container)
}

fn non_empty_attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Splits `"Title (1999)"` into `("Title", "1999")`
fn split_label(label: &str) -> (String, String) {
    let year = year_re()
        .captures(label)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    let title = year_fragment_re().replace(label, "").trim().to_string();
    (title, year)
}

/// Resolves root-relative poster paths against the upstream origin
fn absolute_poster(src: &str, base_url: &Url) -> String {
    if !src.starts_with('/') {
        return src.to_string();
    }

    base_url
        .join(src)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| format!("{}{}", upstream_origin(base_url), src))
}
