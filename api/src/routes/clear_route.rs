//! POST /clear — forget a session.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::chat::chat_request::DEFAULT_SESSION_ID,
};

#[derive(Debug, Default, Deserialize)]
pub struct ClearParams {
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub status: &'static str,
    pub session_id: String,
}

/// Handler: POST /clear
///
/// The session id comes from `?session_id=`, else from a JSON body
/// `{"session_id": ...}`, else `"default"`.
pub async fn clear(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ClearParams>, QueryRejection>,
    body: Bytes,
) -> AppResult<Json<ClearResponse>> {
    let Query(params) = query?;

    let session_id = match params.session_id {
        Some(id) => id,
        None if body.iter().all(u8::is_ascii_whitespace) => DEFAULT_SESSION_ID.to_string(),
        None => serde_json::from_slice::<ClearParams>(&body)
            .map_err(|e| AppError::BadRequest(format!("invalid JSON body: {e}")))?
            .session_id
            .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string()),
    };

    state.assistant.clear_session(&session_id).await;

    Ok(Json(ClearResponse {
        status: "Rozmowa wyczyszczona",
        session_id,
    }))
}
