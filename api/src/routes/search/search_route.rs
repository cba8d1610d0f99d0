//! POST /api/search: nearest chunks for a caller-supplied vector.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use tracing::{debug, error};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::search::search_request::{SearchRequest, SearchResponse},
};

const SEARCH_TOP_K: u64 = 5;

pub async fn search_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> AppResult<Json<SearchResponse>> {
    let Json(req) = payload?;
    if req.vector.is_empty() {
        return Err(AppError::BadRequest("vector must not be empty".into()));
    }

    match state.index.query(req.vector, SEARCH_TOP_K, true).await {
        Ok(results) => {
            debug!(hits = results.len(), "search_route: success");
            Ok(Json(SearchResponse { results }))
        }
        Err(err) => {
            error!(error = %err, "search_route: search failed");
            Err(AppError::Http {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "SEARCH_FAILED",
                message: "Failed to search vectors".into(),
            })
        }
    }
}
