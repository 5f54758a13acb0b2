use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub version: &'static str,
}

/// Handler: GET /
pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        status: "online",
        message: "WAFAM Chatbot API with Advanced RAG",
        version: env!("CARGO_PKG_VERSION"),
    })
}
