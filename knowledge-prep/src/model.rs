use serde::{Deserialize, Serialize};

/// A titled passage of the knowledge base.
///
/// Serialized as one element of the chunk JSON array:
/// ```json
/// { "id": "okna_standard", "title": "Okna standardowe", "content": "...", "char_count": 412 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeChunk {
    /// Section id (not unique: a section may yield several chunks).
    pub id: String,
    /// Display title, used as the citation source.
    pub title: String,
    /// Trimmed chunk text.
    pub content: String,
    /// Number of characters (Unicode scalar values) in `content`.
    pub char_count: usize,
}

impl KnowledgeChunk {
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: String) -> Self {
        let char_count = content.chars().count();
        Self {
            id: id.into(),
            title: title.into(),
            content,
            char_count,
        }
    }
}
