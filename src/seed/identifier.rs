//! Title identifier extraction
//!
//! The related-titles endpoint is keyed by the upstream's numeric title id.
//! It is usually part of the slug; title pages without one carry it in their
//! inline scripts or as a `data-id` attribute.

use regex::Regex;
use std::sync::OnceLock;

static PATH_ID: OnceLock<Regex> = OnceLock::new();
static SCRIPT_ID: OnceLock<Regex> = OnceLock::new();
static DATA_ID: OnceLock<Regex> = OnceLock::new();

fn path_id() -> &'static Regex {
    PATH_ID.get_or_init(|| Regex::new(r"/(?:movies|tv)/(\d+)-").unwrap())
}

fn script_id() -> &'static Regex {
    SCRIPT_ID.get_or_init(|| Regex::new(r#"id['"]\s*:\s*['"]?(\d+)"#).unwrap())
}

fn data_id() -> &'static Regex {
    DATA_ID.get_or_init(|| Regex::new(r#"data-id=['"](\d+)['"]"#).unwrap())
}

/// Extracts the numeric title id for a seed page
///
/// Attempts, first match wins:
/// 1. `/movies/<digits>-...` or `/tv/<digits>-...` in the seed path
/// 2. a JSON-like `id` key with a numeric value in the body
/// 3. a `data-id="<digits>"` attribute in the body
///
/// # Examples
///
/// ```
/// use similar_proxy::seed::extract_id;
///
/// let id = extract_id("/movies/26240-game-of-thrones", "");
/// assert_eq!(id.as_deref(), Some("26240"));
/// ```
pub fn extract_id(seed_path: &str, body: &str) -> Option<String> {
    capture_digits(path_id(), seed_path)
        .or_else(|| capture_digits(script_id(), body))
        .or_else(|| capture_digits(data_id(), body))
}

fn capture_digits(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
