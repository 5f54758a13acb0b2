//! Data types for vector-store interaction: payload shape, search hits,
//! and indexing statistics.

use serde::{Deserialize, Serialize};

use knowledge_prep::KnowledgeChunk;

/// Payload stored alongside each chunk vector in Qdrant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkPayload {
    pub id: String,
    pub title: String,
    pub char_count: usize,
    /// Full chunk text; search results are built from it.
    pub content: String,
}

impl From<&KnowledgeChunk> for ChunkPayload {
    fn from(c: &KnowledgeChunk) -> Self {
        Self {
            id: c.id.clone(),
            title: c.title.clone(),
            char_count: c.char_count,
            content: c.content.clone(),
        }
    }
}

/// A single semantic search hit (ranked by similarity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub score: f32,
    /// Section id from the payload (empty if missing).
    pub id: String,
    /// Chunk title; `None` when the payload has no title.
    pub title: Option<String>,
    pub content: String,
}

/// Summary statistics for a full rebuild.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    pub indexed: usize,
    pub duration_ms: u128,
    /// Versioned collection the alias now points to.
    pub collection: String,
}
