//! POST /api/embed: raw embedding for a piece of text.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use tracing::{debug, error};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::embed::embed_request::{EmbedRequest, EmbedResponse},
};

pub async fn embed_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EmbedRequest>, JsonRejection>,
) -> AppResult<Json<EmbedResponse>> {
    let Json(req) = payload?;
    if req.text.trim().is_empty() {
        return Err(AppError::BadRequest("text must not be empty".into()));
    }

    match state.embedder.embed(&req.text).await {
        Ok(embedding) => {
            debug!(dim = embedding.len(), "embed_route: success");
            Ok(Json(EmbedResponse { embedding }))
        }
        Err(err) => {
            error!(error = %err, "embed_route: embedding failed");
            Err(AppError::Http {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "EMBEDDING_FAILED",
                message: "Failed to generate embedding".into(),
            })
        }
    }
}
