//! HTTP server for Similar-Proxy
//!
//! Routes, CORS and request tracing around the [`Coordinator`].

pub mod error;
pub mod handlers;

use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::config::Config;
use crate::crawler::Coordinator;
use crate::ProxyError;

#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
}

impl AppState {
    pub fn new(coordinator: Coordinator) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/suggestions", get(handlers::suggestions))
        .route("/api/recommendations", get(handlers::recommendations))
        .route("/health", get(handlers::health))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl-C
pub async fn serve(config: &Config) -> Result<(), ProxyError> {
    let coordinator = Coordinator::from_config(config)?;
    info!("Upstream: {}", coordinator.base_url());

    let app = build_router(AppState::new(coordinator));

    let listener = TcpListener::bind((config.server.address.as_str(), config.server.port)).await?;
    let addr = listener.local_addr()?;

    info!("Proxy server running on http://{}", addr);
    info!("Available endpoints:");
    info!("  - GET /api/suggestions?term=<search_term>");
    info!("  - GET /api/recommendations?url=<movie_url>");
    info!("  - GET /health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
