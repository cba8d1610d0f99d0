//! POST /api/chat: retrieval-augmented answer with citations.

use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State};
use rag_chat::ChatResponse;

use crate::core::app_state::AppState;

/// Handler: POST /api/chat
///
/// Always answers `200 OK` with the chat envelope; malformed bodies yield
/// `success: false` like any other pipeline failure.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:3000/api/chat \
///   -H 'content-type: application/json' \
///   -d '{"messages":[{"role":"user","content":"What is alpha?"}],"query":"What is alpha?"}'
/// ```
pub async fn chat_route(State(state): State<Arc<AppState>>, body: Bytes) -> Json<ChatResponse> {
    Json(state.pipeline.handle_bytes(&body).await)
}
