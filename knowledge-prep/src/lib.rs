//! Offline knowledge preparation for the sales chatbot.
//!
//! The flat offer document is scanned line by line and split into titled
//! sections using the keyword table from [`sections`]. The result is a list
//! of [`KnowledgeChunk`] records persisted as a JSON array and later embedded
//! by `rag-base`.
//!
//! Public API:
//! - [`prepare_knowledge`]: read document → split → write chunk file.
//! - [`chunking::split_into_chunks`]: the pure splitter.
//! - [`export`]: document loading and chunk (de)serialization.

pub mod chunking;
pub mod export;
pub mod model;
pub mod sections;

use std::path::Path;

use anyhow::Result;
use tracing::info;

pub use chunking::split_into_chunks;
pub use model::KnowledgeChunk;
pub use sections::{SectionDef, default_sections};

/// Run the whole preparation step with the default WAFAM section table.
///
/// Returns the produced chunks so callers can print a summary.
#[tracing::instrument(level = "info", skip_all, fields(input = %input.display(), output = %output.display()))]
pub fn prepare_knowledge(input: &Path, output: &Path) -> Result<Vec<KnowledgeChunk>> {
    let text = export::load_document(input)?;
    info!(chars = text.chars().count(), "knowledge document loaded");

    let sections = default_sections();
    let chunks = split_into_chunks(&text, &sections);
    info!(chunks = chunks.len(), "document split into chunks");

    export::write_chunks_json(output, &chunks)?;
    Ok(chunks)
}
