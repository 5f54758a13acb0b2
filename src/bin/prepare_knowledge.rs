//! Split the flat knowledge document into titled chunks and write them as JSON.
//!
//! Paths come from `KNOWLEDGE_DOC_PATH` and `CHUNKS_PATH`.

use std::{env, path::PathBuf};

use anyhow::Result;
use knowledge_prep::{export::summary_lines, prepare_knowledge};
use tracing::warn;

const DEFAULT_DOC_PATH: &str = "data/wafam_oferta.txt";
const DEFAULT_CHUNKS_PATH: &str = "data/wafam_chunks.json";

fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!(".env not loaded: {e}");
    }
    api::init_tracing()?;

    let input = path_from_env("KNOWLEDGE_DOC_PATH", DEFAULT_DOC_PATH);
    let output = path_from_env("CHUNKS_PATH", DEFAULT_CHUNKS_PATH);

    let chunks = prepare_knowledge(&input, &output)?;
    if chunks.is_empty() {
        warn!("no chunks produced; check the document and the section keywords");
    }

    println!("Podzielono na {} fragmentów:", chunks.len());
    for line in summary_lines(&chunks) {
        println!("  {line}");
    }
    println!("Zapisano do: {}", output.display());

    Ok(())
}

fn path_from_env(key: &str, default: &str) -> PathBuf {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
