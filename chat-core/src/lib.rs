//! Conversation engine for the WAFAM sales chatbot.
//!
//! Public API: [`SalesAssistant`]. Each turn expands short replies with the
//! remembered topic, retrieves a few knowledge passages (or uses the whole
//! knowledge text in static mode), sends a bounded prompt to the completion
//! model, and updates the session memory.

pub mod assistant;
pub mod cfg;
pub mod completion;
pub mod error;
pub mod history;
pub mod prompt;
pub mod query;
pub mod retrieval;
pub mod session;
pub mod session_store;

use std::sync::Arc;

use tracing::info;

use ai_llm_service::LlmServiceProfiles;
use rag_base::{KnowledgeIndex, RagConfig};

pub use assistant::{ChatReply, ContextSource, SalesAssistant};
pub use cfg::{AssistantConfig, ContextMode};
pub use completion::ChatCompleter;
pub use error::ChatError;
pub use retrieval::{Passage, Retriever};
pub use session_store::{ExpirationPolicy, IdleTimeout, NeverExpire, SessionStore};

/// Wire an assistant from environment config and a shared LLM service.
///
/// Retrieval mode connects to the Qdrant alias; static mode reads the
/// knowledge document once.
pub async fn assistant_from_env(
    llm: Arc<LlmServiceProfiles>,
) -> Result<SalesAssistant, ChatError> {
    let cfg = AssistantConfig::from_env()?;

    let context = match cfg.context_mode {
        ContextMode::Retrieval => {
            let rag_cfg = RagConfig::from_env()?;
            info!(
                qdrant = %rag_cfg.qdrant.url,
                alias = %rag_cfg.qdrant.collection,
                "retrieval context"
            );
            let index = KnowledgeIndex::connect(rag_cfg, llm.clone()).await?;
            ContextSource::Retrieval(Arc::new(index))
        }
        ContextMode::Static => {
            let text = tokio::fs::read_to_string(&cfg.knowledge_doc_path).await?;
            info!(
                path = %cfg.knowledge_doc_path.display(),
                chars = text.chars().count(),
                "static knowledge context"
            );
            ContextSource::StaticKnowledge(text)
        }
    };

    Ok(SalesAssistant::new(cfg, context, llm))
}
