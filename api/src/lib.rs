//! HTTP surface of the RAG chat backend.
//!
//! | route | purpose |
//! |---|---|
//! | `POST /api/chat` | answer a question with citations (always `200` + envelope) |
//! | `POST /api/ingest` | chunk, embed and store a document |
//! | `POST /api/embed` | raw embedding for a text |
//! | `POST /api/search` | top-5 matches for a vector |
//! | `GET /health` | LLM provider probes |

use std::{env, sync::Arc};

pub mod core;
pub mod error_handler;
mod routes;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tracing::{error, info};

pub use crate::core::app_state::AppState;
pub use crate::error_handler::AppError;
use crate::routes::{
    chat::chat_route::chat_route, embed::embed_route::embed_route, health_route::health_route,
    ingest::ingest_route::ingest_route, search::search_route::search_route,
};

const DEFAULT_API_ADDRESS: &str = "0.0.0.0:3000";

/// Builds the application router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/chat", post(chat_route))
        .route("/api/ingest", post(ingest_route))
        .route("/api/embed", post(embed_route))
        .route("/api/search", post(search_route))
        .route("/health", get(health_route))
        .with_state(state)
}

/// Loads state from the environment and serves until Ctrl+C.
///
/// # Errors
/// Fails on invalid configuration, when the address cannot be bound, or if
/// the server stops with an I/O error.
pub async fn start() -> Result<(), AppError> {
    let addr = env::var("API_ADDRESS")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_ADDRESS.to_string());

    let state = Arc::new(AppState::from_env()?);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| AppError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!(%addr, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
