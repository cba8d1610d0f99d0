//! GET /health: liveness plus LLM provider probes.

use std::sync::Arc;

use ai_llm_service::health_service::HealthStatus;
use axum::{extract::State, http::StatusCode, response::Response};

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};

pub async fn health_route(State(state): State<Arc<AppState>>) -> Response {
    let statuses: Vec<HealthStatus> = match &state.llm {
        Some(llm) => llm.health_all().await,
        None => Vec::new(),
    };

    if statuses.iter().all(|s| s.ok) {
        ApiResponse::success(statuses).into_response_with_status(StatusCode::OK)
    } else {
        ApiResponse::error_with_data("LLM_UNHEALTHY", "one or more LLM profiles are unhealthy", statuses)
            .into_response_with_status(StatusCode::SERVICE_UNAVAILABLE)
    }
}
