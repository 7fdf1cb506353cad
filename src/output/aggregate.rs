use crate::output::types::{AggregateResult, TitleKind, TitleRecord};

/// Wraps accumulated titles into the response payload
///
/// Counts movies and shows without reordering the items.
///
/// # Examples
///
/// ```
/// use similar_proxy::output::aggregate;
///
/// let result = aggregate(Vec::new());
/// assert!(result.success);
/// assert_eq!(result.total, 0);
/// ```
pub fn aggregate(items: Vec<TitleRecord>) -> AggregateResult {
    let tv_count = items
        .iter()
        .filter(|item| item.kind == TitleKind::Tv)
        .count();
    let movie_count = items.len() - tv_count;

    AggregateResult {
        success: true,
        total: items.len(),
        movie_count,
        tv_count,
        items,
    }
}
