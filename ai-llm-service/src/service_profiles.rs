//! Shared LLM service with two profiles: `chat` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Each profile owns one preconfigured HTTP client.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::{ChatMessage, LlmServiceProfiles};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = Arc::new(LlmServiceProfiles::from_env()?);
//!
//! let answer = svc.chat(&[ChatMessage::user("Jakie okna polecacie?")]).await?;
//! println!("{answer}");
//!
//! let emb = svc.embed("okna PCV").await?;
//! println!("Embedding dim = {}", emb.len());
//! # Ok(()) }
//! ```

use crate::{
    config::{
        default_config::{config_openai_chat, config_openai_embedding},
        llm_model_config::LlmModelConfig,
    },
    error_handler::AiLlmError,
    messages::ChatMessage,
    services::open_ai_service::OpenAiService,
};

/// Chat + embedding clients used by the chatbot and the index builder.
#[derive(Debug)]
pub struct LlmServiceProfiles {
    chat: OpenAiService,
    embedding: OpenAiService,
}

impl LlmServiceProfiles {
    /// Creates the service from explicit profiles.
    pub fn new(chat: LlmModelConfig, embedding: LlmModelConfig) -> Result<Self, AiLlmError> {
        Ok(Self {
            chat: OpenAiService::new(chat)?,
            embedding: OpenAiService::new(embedding)?,
        })
    }

    /// Creates the service from `OPENAI_*` / `LLM_*` environment variables.
    pub fn from_env() -> Result<Self, AiLlmError> {
        Self::new(config_openai_chat()?, config_openai_embedding()?)
    }

    /// Runs a chat completion on the **chat** profile.
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String, AiLlmError> {
        self.chat.chat(messages).await
    }

    /// Computes one embedding on the **embedding** profile.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        self.embedding.embeddings(input).await
    }

    /// Computes embeddings for a batch of inputs, preserving order.
    pub async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AiLlmError> {
        self.embedding.embeddings_batch(inputs).await
    }

    /// Returns references to the current profiles `(chat, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (self.chat.config(), self.embedding.config())
    }
}
