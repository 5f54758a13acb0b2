//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ChatError;

/// Where the knowledge context of a conversation comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextMode {
    /// Per-question similarity search over the index.
    Retrieval,
    /// Whole knowledge document embedded into the system prompt.
    Static,
}

impl ContextMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextMode::Retrieval => "retrieval",
            ContextMode::Static => "static",
        }
    }
}

/// Config bag for the assistant. All fields have defaults via `from_env`.
#[derive(Clone, Debug)]
pub struct AssistantConfig {
    pub context_mode: ContextMode,
    /// Passages retrieved per question.
    pub context_k: usize,
    /// Each passage is clipped to this many characters.
    pub passage_max_chars: usize,
    /// Source document for static mode.
    pub knowledge_doc_path: PathBuf,
    /// Idle expiration for sessions; `None` keeps them for the process lifetime.
    pub session_idle_ttl: Option<Duration>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            context_mode: ContextMode::Retrieval,
            context_k: 2,
            passage_max_chars: 300,
            knowledge_doc_path: PathBuf::from("data/wafam_oferta.txt"),
            session_idle_ttl: None,
        }
    }
}

impl AssistantConfig {
    /// Build from `CONTEXT_MODE`, `RAG_CONTEXT_K`, `RAG_PASSAGE_MAX_CHARS`,
    /// `KNOWLEDGE_DOC_PATH` and `SESSION_IDLE_TTL_SECS`.
    pub fn from_env() -> Result<Self, ChatError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ChatError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();

        let context_mode = match lookup("CONTEXT_MODE")
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty())
            .as_deref()
        {
            None | Some("retrieval") | Some("rag") => ContextMode::Retrieval,
            Some("static") => ContextMode::Static,
            Some(other) => {
                return Err(ChatError::Config(format!(
                    "CONTEXT_MODE must be 'retrieval' or 'static', got '{other}'"
                )));
            }
        };

        let context_k = parse(&lookup, "RAG_CONTEXT_K")?.unwrap_or(d.context_k);
        let passage_max_chars =
            parse(&lookup, "RAG_PASSAGE_MAX_CHARS")?.unwrap_or(d.passage_max_chars);
        if context_k == 0 || passage_max_chars == 0 {
            return Err(ChatError::Config(
                "RAG_CONTEXT_K and RAG_PASSAGE_MAX_CHARS must be > 0".into(),
            ));
        }

        let knowledge_doc_path = lookup("KNOWLEDGE_DOC_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(d.knowledge_doc_path);

        let session_idle_ttl =
            parse::<u64, _>(&lookup, "SESSION_IDLE_TTL_SECS")?.map(Duration::from_secs);

        Ok(Self {
            context_mode,
            context_k,
            passage_max_chars,
            knowledge_doc_path,
            session_idle_ttl,
        })
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ChatError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ChatError::Config(format!("{key}: cannot parse '{v}'"))),
        _ => Ok(None),
    }
}
