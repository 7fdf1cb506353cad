use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::error::ApiError;
use super::AppState;
use crate::crawler::Recommendation;
use crate::seed::SeedRequest;

/// Raw query pairs; repeated keys are kept in order
pub type QueryPairs = Vec<(String, String)>;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// `GET /api/suggestions?term=`: upstream autocomplete JSON, unmodified
pub async fn suggestions(
    State(state): State<AppState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Response, ApiError> {
    let term = required(query, "term", "Term parameter is required")?;

    let body = state
        .coordinator
        .suggestions(&term)
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch suggestions", e))?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// `GET /api/recommendations?url=`: titles related to a seed page
pub async fn recommendations(
    State(state): State<AppState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Response, ApiError> {
    let url = required(query, "url", "URL parameter is required")?;
    let seed = SeedRequest::new(&url);

    // Dropping this handler (client gone) cancels the walk
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let recommendation = state
        .coordinator
        .recommendations(&seed, &cancel)
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch recommendations", e))?;

    Ok(match recommendation {
        Recommendation::Aggregate(result) => Json(result).into_response(),
        Recommendation::RawHtml(html) => Html(html).into_response(),
    })
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// First non-empty value for `key`; an unreadable query counts as missing
fn required(
    query: Result<Query<QueryPairs>, QueryRejection>,
    key: &str,
    message: &'static str,
) -> Result<String, ApiError> {
    let Query(pairs) = query.map_err(|e| {
        tracing::debug!("Rejected query string: {}", e);
        ApiError::MissingParameter(message)
    })?;

    pairs
        .into_iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v)
        .find(|v| !v.is_empty())
        .ok_or(ApiError::MissingParameter(message))
}
