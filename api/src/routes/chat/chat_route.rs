//! POST /chat — one conversational turn.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::debug;

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::chat::chat_request::{ChatRequest, ChatResponse},
};

/// Handler: POST /chat
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/chat \
///   -H 'content-type: application/json' \
///   -d '{"text":"Jakie okna polecacie?","session_id":"abc"}'
/// ```
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(body) = payload?;
    debug!(session_id = %body.session_id, chars = body.text.chars().count(), "chat: start");

    let reply = state
        .assistant
        .converse(&body.text, &body.session_id)
        .await?;

    Ok(Json(ChatResponse {
        bot: reply.answer,
        sources: reply.sources,
    }))
}
