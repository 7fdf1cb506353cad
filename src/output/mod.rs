//! Output module for shaping scraped titles into API payloads
//!
//! This module holds the title record model and the aggregator that turns an
//! accumulated list of titles into the recommendations response.

mod aggregate;
mod types;

pub use aggregate::aggregate;
pub use types::{AggregateResult, PageResult, TitleKind, TitleRecord};
