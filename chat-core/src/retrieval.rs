//! Retrieval seam and passage shaping.

use std::{future::Future, pin::Pin};

use serde::{Deserialize, Serialize};

use rag_base::{KnowledgeIndex, SearchHit};

use crate::error::ChatError;
use crate::history::clip_chars;

/// Source label used when a hit carries no title.
pub const UNKNOWN_SOURCE: &str = "Nieznane";

/// Sources returned with an answer.
pub const MAX_SOURCES: usize = 2;

pub type ChatFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ChatError>> + Send + 'a>>;

/// Similarity search over the knowledge base.
pub trait Retriever: Send + Sync {
    /// Up to `k` hits for `query`, best first.
    fn retrieve<'a>(&'a self, query: &'a str, k: usize) -> ChatFuture<'a, Vec<SearchHit>>;
}

impl Retriever for KnowledgeIndex {
    fn retrieve<'a>(&'a self, query: &'a str, k: usize) -> ChatFuture<'a, Vec<SearchHit>> {
        Box::pin(async move { Ok(self.search(query, k).await?) })
    }
}

/// A clipped knowledge passage with its source title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub content: String,
    pub source: String,
}

impl Passage {
    pub fn from_hit(hit: SearchHit, max_chars: usize) -> Self {
        Self {
            content: clip_chars(&hit.content, max_chars).to_string(),
            source: hit.title.unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
        }
    }
}

/// Retrieve and shape passages; scores are dropped.
pub async fn retrieve_passages(
    retriever: &dyn Retriever,
    query: &str,
    k: usize,
    max_chars: usize,
) -> Result<Vec<Passage>, ChatError> {
    let hits = retriever.retrieve(query, k).await?;
    Ok(hits
        .into_iter()
        .take(k)
        .map(|h| Passage::from_hit(h, max_chars))
        .collect())
}

/// Distinct sources in first-seen order, capped at [`MAX_SOURCES`].
pub fn dedup_sources(passages: &[Passage]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(MAX_SOURCES);
    for p in passages {
        if out.len() == MAX_SOURCES {
            break;
        }
        if !out.contains(&p.source) {
            out.push(p.source.clone());
        }
    }
    out
}
