//! Document loading and chunk file I/O.
//!
//! The chunk file is a single pretty-printed JSON array of [`KnowledgeChunk`]
//! objects, UTF-8 encoded with non-ASCII characters written verbatim.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use tracing::info;

use crate::model::KnowledgeChunk;

/// Read the flat knowledge document.
pub fn load_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

/// Write chunks as a pretty JSON array, creating parent directories.
pub fn write_chunks_json(path: &Path, chunks: &[KnowledgeChunk]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }

    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, chunks)?;
    w.write_all(b"\n")?;
    w.flush()?;

    info!("chunks: wrote {} records -> {}", chunks.len(), path.display());
    Ok(())
}

/// Read a chunk file produced by [`write_chunks_json`].
pub fn read_chunks_json(path: &Path) -> Result<Vec<KnowledgeChunk>> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let chunks = serde_json::from_str(&raw)
        .with_context(|| format!("parse chunk array in {}", path.display()))?;
    Ok(chunks)
}

/// One summary line per chunk: `n. title (count znaków)`.
pub fn summary_lines(chunks: &[KnowledgeChunk]) -> Vec<String> {
    chunks
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {} ({} znaków)", i + 1, c.title, c.char_count))
        .collect()
}
