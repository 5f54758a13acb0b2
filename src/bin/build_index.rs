//! Rebuild the Qdrant knowledge index from the prepared chunk file.
//!
//! The new collection is filled first and the alias is swapped at the end, so
//! a running chat service keeps answering from the previous index meanwhile.

use std::time::Duration;

use ai_llm_service::LlmServiceProfiles;
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rag_base::{RagConfig, build_index};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!(".env not loaded: {e}");
    }
    api::init_tracing()?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}")?.tick_chars("-\\|/ "));
    pb.enable_steady_tick(Duration::from_millis(80));

    pb.set_message("[1/4] loading configuration");
    let cfg = RagConfig::from_env()?;

    pb.set_message("[2/4] preparing embeddings client");
    let llm = LlmServiceProfiles::from_env()?;

    pb.set_message(format!(
        "[3/4] embedding {} and writing to Qdrant",
        cfg.chunks_path.display()
    ));
    let stats = match build_index(&cfg, &llm).await {
        Ok(stats) => stats,
        Err(e) => {
            pb.abandon_with_message("index build failed, previous index left in place");
            return Err(e.into());
        }
    };

    pb.finish_with_message(format!(
        "[4/4] indexed {} chunks into {} (alias {}) in {} ms",
        stats.indexed, stats.collection, cfg.qdrant.collection, stats.duration_ms
    ));

    Ok(())
}
