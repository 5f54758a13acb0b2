//! The conversational turn: expand, retrieve, compose, complete, remember.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use ai_llm_service::ChatMessage;

use crate::cfg::{AssistantConfig, ContextMode};
use crate::completion::ChatCompleter;
use crate::error::ChatError;
use crate::history::{compress_history, truncate_history};
use crate::prompt::{SYSTEM_PROMPT, build_user_prompt, static_system_prompt};
use crate::query::expand_query;
use crate::retrieval::{Passage, Retriever, dedup_sources, retrieve_passages};
use crate::session::Turn;
use crate::session_store::SessionStore;

/// Answer returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub answer: String,
    pub sources: Vec<String>,
}

/// Where knowledge context comes from for each turn.
pub enum ContextSource {
    Retrieval(Arc<dyn Retriever>),
    /// Full knowledge text, placed into the system prompt.
    StaticKnowledge(String),
}

impl ContextSource {
    pub fn mode(&self) -> ContextMode {
        match self {
            ContextSource::Retrieval(_) => ContextMode::Retrieval,
            ContextSource::StaticKnowledge(_) => ContextMode::Static,
        }
    }
}

pub struct SalesAssistant {
    cfg: AssistantConfig,
    context: ContextSource,
    completer: Arc<dyn ChatCompleter>,
    sessions: SessionStore,
    system_prompt: String,
}

impl SalesAssistant {
    pub fn new(
        cfg: AssistantConfig,
        context: ContextSource,
        completer: Arc<dyn ChatCompleter>,
    ) -> Self {
        let system_prompt = match &context {
            ContextSource::Retrieval(_) => SYSTEM_PROMPT.to_string(),
            ContextSource::StaticKnowledge(text) => static_system_prompt(text),
        };
        let sessions = SessionStore::with_idle_ttl(cfg.session_idle_ttl);
        Self {
            cfg,
            context,
            completer,
            sessions,
            system_prompt,
        }
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.cfg
    }

    pub fn context_mode(&self) -> ContextMode {
        self.context.mode()
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Answer one customer message within `session_id`.
    ///
    /// The session stays locked for the whole turn. History and topic change
    /// only after the completion succeeds.
    pub async fn converse(&self, text: &str, session_id: &str) -> Result<ChatReply, ChatError> {
        let handle = self.sessions.get_or_create(session_id).await;
        let mut session = handle.lock().await;

        let expansion = expand_query(text, session.topic.as_deref());
        debug!(
            session_id,
            query = %expansion.query,
            expanded = expansion.query != text,
            "query prepared"
        );

        let (user_prompt, sources) = match &self.context {
            ContextSource::Retrieval(retriever) => {
                let passages = retrieve_passages(
                    retriever.as_ref(),
                    &expansion.query,
                    self.cfg.context_k,
                    self.cfg.passage_max_chars,
                )
                .await?;
                let texts: Vec<&str> = passages.iter().map(|p| p.content.as_str()).collect();
                (build_user_prompt(&texts, text), dedup_sources(&passages))
            }
            ContextSource::StaticKnowledge(_) => (text.to_string(), Vec::new()),
        };

        let prior = compress_history(&session.history);
        let mut messages = Vec::with_capacity(prior.len() + 2);
        messages.push(ChatMessage::system(self.system_prompt.as_str()));
        messages.extend(prior.iter().map(Turn::to_message));
        messages.push(ChatMessage::user(user_prompt.as_str()));

        let answer = self.completer.complete(&messages).await?;

        session.history.push(Turn::user(user_prompt));
        session.history.push(Turn::assistant(answer.as_str()));
        truncate_history(&mut session.history);
        if let Some(topic) = expansion.new_topic {
            session.topic = Some(topic);
        }

        info!(
            session_id,
            sources = sources.len(),
            history = session.history.len(),
            "chat turn completed"
        );

        Ok(ChatReply { answer, sources })
    }

    /// Forget history and topic of `session_id`. Unknown ids are fine.
    pub async fn clear_session(&self, session_id: &str) {
        let existed = self.sessions.clear(session_id).await;
        debug!(session_id, existed, "session cleared");
    }

    /// Direct similarity search, bypassing the completion model.
    pub async fn search_knowledge(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Passage>, ChatError> {
        let ContextSource::Retrieval(retriever) = &self.context else {
            return Err(ChatError::SearchUnavailable);
        };
        if limit == 0 {
            return Err(ChatError::InvalidRequest("limit must be at least 1".into()));
        }
        if query.trim().is_empty() {
            return Err(ChatError::InvalidRequest("query must not be empty".into()));
        }

        retrieve_passages(
            retriever.as_ref(),
            query,
            limit,
            self.cfg.passage_max_chars,
        )
        .await
    }
}
