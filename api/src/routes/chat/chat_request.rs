use serde::{Deserialize, Serialize};

/// Session used when the client does not send one.
pub const DEFAULT_SESSION_ID: &str = "default";

pub fn default_session_id() -> String {
    DEFAULT_SESSION_ID.to_string()
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
    #[serde(default = "default_session_id")]
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub bot: String,
    pub sources: Vec<String>,
}
