//! Typed error for the chat-core crate.

use thiserror::Error;

use ai_llm_service::AiLlmError;
use rag_base::RagBaseError;

#[derive(Debug, Error)]
pub enum ChatError {
    /// Chat-completion provider failed (transport, status, decode, missing key).
    #[error("completion error: {0}")]
    Completion(#[from] AiLlmError),

    /// Query embedding failed while retrieving context.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Vector store failure.
    #[error("index error: {0}")]
    Index(RagBaseError),

    /// Caller supplied an unusable argument.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Direct knowledge search is not offered when context is static.
    #[error("knowledge search is unavailable in static context mode")]
    SearchUnavailable,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<RagBaseError> for ChatError {
    fn from(e: RagBaseError) -> Self {
        match e {
            RagBaseError::Embedding(msg) => ChatError::Embedding(msg),
            other => ChatError::Index(other),
        }
    }
}
