use chat_core::SalesAssistant;
use serde::Serialize;

/// Static metadata served by `GET /info`.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub project: String,
    pub ai_model: String,
    pub embeddings: String,
    pub vector_db: String,
    pub context_mode: String,
    pub version: String,
}

impl ServiceInfo {
    pub fn new(ai_model: &str, embeddings: &str, context_mode: &str) -> Self {
        Self {
            project: "WAFAM Sales Chatbot".to_string(),
            ai_model: ai_model.to_string(),
            embeddings: embeddings.to_string(),
            vector_db: "Qdrant".to_string(),
            context_mode: context_mode.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Shared state for all HTTP handlers.
pub struct AppState {
    pub assistant: SalesAssistant,
    pub info: ServiceInfo,
}

impl AppState {
    pub fn new(assistant: SalesAssistant, info: ServiceInfo) -> Self {
        Self { assistant, info }
    }
}
