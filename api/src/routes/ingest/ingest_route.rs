//! POST /api/ingest: chunk, embed and store an uploaded document.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rag_chat::IngestResponse;
use tracing::{error, warn};

use crate::core::app_state::AppState;

/// Handler: POST /api/ingest
///
/// Body `{content, fileName}`. Replies `{success, chunks, error?}` with
/// `200`, `400` for invalid documents or `500` when embedding/storage fails.
pub async fn ingest_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(v)) => v,
        Err(rej) => {
            warn!(error = %rej.body_text(), "ingest_route: unreadable body");
            return (
                StatusCode::BAD_REQUEST,
                Json(IngestResponse::failure(rej.body_text())),
            )
                .into_response();
        }
    };

    match state.ingestor.handle(body).await {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(err) if err.is_validation() => {
            warn!(error = %err, "ingest_route: rejected");
            (
                StatusCode::BAD_REQUEST,
                Json(IngestResponse::failure(err.user_message())),
            )
                .into_response()
        }
        Err(err) => {
            error!(error = %err, "ingest_route: ingestion failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(IngestResponse::failure(err.user_message())),
            )
                .into_response()
        }
    }
}
