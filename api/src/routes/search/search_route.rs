//! GET /search — raw knowledge passages, no completion.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use tracing::debug;

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::search::search_request::{DEFAULT_SEARCH_LIMIT, SearchParams, SearchResponse},
};

/// Handler: GET /search?query=...&limit=...
pub async fn search(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> AppResult<Json<SearchResponse>> {
    let Query(p) = params?;
    let limit = p.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);

    let results = state.assistant.search_knowledge(&p.query, limit).await?;
    debug!(query = %p.query, limit, hits = results.len(), "search: done");

    Ok(Json(SearchResponse {
        query: p.query,
        results,
    }))
}
