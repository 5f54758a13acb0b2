use std::sync::Arc;

use axum::{Json, extract::State};

use crate::core::app_state::{AppState, ServiceInfo};

/// Handler: GET /info
pub async fn info(State(state): State<Arc<AppState>>) -> Json<ServiceInfo> {
    Json(state.info.clone())
}
