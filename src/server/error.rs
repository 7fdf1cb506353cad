use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::ProxyError;

/// Error body returned by every endpoint
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Failures at the route boundary
///
/// Upstream detail is logged, never sent to the caller.
#[derive(Debug)]
pub enum ApiError {
    /// A required query parameter is missing or empty
    MissingParameter(&'static str),
    /// The upstream could not be used to answer the request
    Upstream {
        message: &'static str,
        source: ProxyError,
    },
}

impl ApiError {
    pub fn upstream(message: &'static str, source: ProxyError) -> Self {
        Self::Upstream { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingParameter(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::MissingParameter(message) => message,
            Self::Upstream { message, source } => {
                tracing::error!("{}: {}", message, source);
                message
            }
        };

        (
            status,
            Json(ErrorBody {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
