//! Shared LLM access for the sales chatbot.
//!
//! - [`services::open_ai_service::OpenAiService`]: chat completions and embeddings
//!   against an OpenAI-compatible REST API.
//! - [`service_profiles::LlmServiceProfiles`]: the two profiles the app uses
//!   (`chat` and `embedding`), built once and shared behind `Arc`.
//! - [`config`]: env-driven model configs.
//! - [`error_handler`]: unified error type.

pub mod config;
pub mod error_handler;
pub mod messages;
pub mod service_profiles;
pub mod services;

pub use config::llm_model_config::LlmModelConfig;
pub use error_handler::AiLlmError;
pub use messages::{ChatMessage, ChatRole};
pub use service_profiles::LlmServiceProfiles;
