//! Chat-completion seam.

use ai_llm_service::{ChatMessage, LlmServiceProfiles};

use crate::retrieval::ChatFuture;

pub trait ChatCompleter: Send + Sync {
    fn complete<'a>(&'a self, messages: &'a [ChatMessage]) -> ChatFuture<'a, String>;
}

impl ChatCompleter for LlmServiceProfiles {
    fn complete<'a>(&'a self, messages: &'a [ChatMessage]) -> ChatFuture<'a, String> {
        Box::pin(async move { Ok(self.chat(messages).await?) })
    }
}
