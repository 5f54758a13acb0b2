//! Public API:
//! - `build_index`: read chunk JSON, embed, upsert into a versioned collection, swap the alias.
//! - `KnowledgeIndex::search`: embed a query and return the top-k chunks behind the alias.

pub mod embedding;
pub mod errors;
pub mod structs;
pub mod vector_db;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use qdrant_client::Qdrant;
use tracing::{debug, error, info, warn};

use knowledge_prep::KnowledgeChunk;

pub use embedding::EmbeddingsProvider;
pub use errors::rag_base_error::RagBaseError;
pub use structs::rag_base_config::{DistanceMetric, QdrantConfig, RagConfig};
pub use structs::rag_store::{ChunkPayload, IndexStats, SearchHit};

use embedding::embed_in_batches;
use vector_db::{
    alias_target, connect, create_collection, delete_collection_quiet, plain_collection_exists,
    search_top_k, swap_alias, upsert_batch, versioned_collection_name,
};

/// Read the chunk array written by `knowledge-prep`.
pub async fn read_chunks(path: &Path) -> Result<Vec<KnowledgeChunk>, RagBaseError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let chunks: Vec<KnowledgeChunk> = serde_json::from_str(&raw)?;
    debug!(path = %path.display(), chunks = chunks.len(), "chunk file parsed");
    Ok(chunks)
}

/// Full rebuild from `cfg.chunks_path`.
///
/// Reading and embedding happen before Qdrant is touched, so a failure there
/// leaves the live index as it was.
pub async fn build_index(
    cfg: &RagConfig,
    embedder: &dyn EmbeddingsProvider,
) -> Result<IndexStats, RagBaseError> {
    let started = Instant::now();
    info!(
        target: "rag_base::index",
        chunks_path = %cfg.chunks_path.display(),
        alias = %cfg.qdrant.collection,
        "build_index: start"
    );

    let chunks = read_chunks(&cfg.chunks_path).await?;
    let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
    let vectors =
        embed_in_batches(embedder, &texts, cfg.qdrant.batch_size, cfg.embedding_dim).await?;

    let mut stats = publish_index(cfg, &chunks, vectors).await?;
    stats.duration_ms = started.elapsed().as_millis();

    info!(
        target: "rag_base::index",
        indexed = stats.indexed,
        collection = %stats.collection,
        duration_ms = stats.duration_ms,
        "build_index: finished"
    );
    Ok(stats)
}

/// Write already embedded chunks into a new collection and point the alias at it.
pub async fn publish_index(
    cfg: &RagConfig,
    chunks: &[KnowledgeChunk],
    vectors: Vec<Vec<f32>>,
) -> Result<IndexStats, RagBaseError> {
    if chunks.len() != vectors.len() {
        return Err(RagBaseError::InvalidConfig(format!(
            "{} chunks but {} vectors",
            chunks.len(),
            vectors.len()
        )));
    }

    let started = Instant::now();
    let client = connect(cfg).await?;
    let alias = cfg.qdrant.collection.as_str();
    let collection = versioned_collection_name(alias, chrono::Utc::now().timestamp_millis());

    create_collection(&client, cfg, &collection).await?;

    let indexed = match fill_and_swap(&client, cfg, &collection, chunks, vectors).await {
        Ok(outcome) => {
            if let Some(previous) = outcome.previous.filter(|p| p != &collection) {
                delete_collection_quiet(&client, &previous).await;
            }
            outcome.indexed
        }
        Err(e) => {
            warn!(
                target: "rag_base::index",
                collection = %collection,
                error = %e,
                "publish_index: failed, dropping partial collection"
            );
            delete_collection_quiet(&client, &collection).await;
            return Err(e);
        }
    };

    Ok(IndexStats {
        indexed,
        duration_ms: started.elapsed().as_millis(),
        collection,
    })
}

struct SwapOutcome {
    indexed: usize,
    previous: Option<String>,
}

async fn fill_and_swap(
    client: &Qdrant,
    cfg: &RagConfig,
    collection: &str,
    chunks: &[KnowledgeChunk],
    vectors: Vec<Vec<f32>>,
) -> Result<SwapOutcome, RagBaseError> {
    let mut points: Vec<(u64, Vec<f32>, ChunkPayload)> = chunks
        .iter()
        .zip(vectors)
        .enumerate()
        .map(|(pos, (chunk, vector))| (pos as u64, vector, ChunkPayload::from(chunk)))
        .collect();

    let mut indexed = 0usize;
    let batch_size = cfg.qdrant.batch_size.max(1);
    while !points.is_empty() {
        let rest = points.split_off(batch_size.min(points.len()));
        indexed += upsert_batch(client, cfg, collection, points).await?;
        points = rest;
    }
    debug!(collection, indexed, "points upserted");

    let alias = cfg.qdrant.collection.as_str();
    let previous = alias_target(client, alias).await?;

    // Qdrant refuses an alias named like an existing collection.
    let legacy_removed = previous.is_none() && plain_collection_exists(client, alias).await?;
    if legacy_removed {
        warn!(
            target: "rag_base::index",
            alias,
            "legacy collection occupies the alias name; removing it"
        );
        client
            .delete_collection(alias)
            .await
            .map_err(|e| RagBaseError::Qdrant(format!("delete legacy {alias}: {e}")))?;
    }

    let http = reqwest::Client::new();
    point_alias(&http, cfg, collection, previous.is_some(), legacy_removed).await?;

    Ok(SwapOutcome { indexed, previous })
}

/// Swap the alias; after a legacy removal a failure leaves nothing to serve.
async fn point_alias(
    http: &reqwest::Client,
    cfg: &RagConfig,
    collection: &str,
    alias_exists: bool,
    legacy_removed: bool,
) -> Result<(), RagBaseError> {
    let Err(e) = swap_alias(http, cfg, collection, alias_exists).await else {
        return Ok(());
    };
    if !legacy_removed {
        return Err(e);
    }

    error!(
        target: "rag_base::index",
        alias = %cfg.qdrant.collection,
        collection,
        error = %e,
        "alias swap failed after the legacy collection was removed; no index is served"
    );
    Err(RagBaseError::Qdrant(format!(
        "{e}; legacy collection {} was already removed, no index is served",
        cfg.qdrant.collection
    )))
}

/// Query-time handle: Qdrant client, config, and the embedder used at build time.
#[derive(Clone)]
pub struct KnowledgeIndex {
    client: Qdrant,
    cfg: RagConfig,
    embedder: Arc<dyn EmbeddingsProvider>,
}

impl KnowledgeIndex {
    pub async fn connect(
        cfg: RagConfig,
        embedder: Arc<dyn EmbeddingsProvider>,
    ) -> Result<Self, RagBaseError> {
        let client = connect(&cfg).await?;
        Ok(Self {
            client,
            cfg,
            embedder,
        })
    }

    pub fn config(&self) -> &RagConfig {
        &self.cfg
    }

    /// Embed `query` and return up to `k` nearest chunks, best first.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>, RagBaseError> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let vector = self.embedder.embed(query).await?;
        embedding::check_dim(&vector, self.cfg.embedding_dim)?;

        let hits = search_top_k(&self.client, &self.cfg, vector, k).await?;
        debug!(
            target: "rag_base::search",
            k,
            hits = hits.len(),
            "search finished"
        );
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_prepared_chunk_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"drzwi","title":"Drzwi","content":"Drzwi zewnętrzne aluminiowe.","char_count":28}}]"#
        )
        .unwrap();

        let chunks = read_chunks(file.path()).await.unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].title, "Drzwi");
        assert_eq!(ChunkPayload::from(&chunks[0]).char_count, 28);
    }

    #[tokio::test]
    async fn malformed_chunk_file_is_a_json_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = read_chunks(file.path()).await.unwrap_err();
        assert!(matches!(err, RagBaseError::Json(_)));
    }

    /// Accepts one HTTP request and answers it with `status_line`.
    async fn answer_once(status_line: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut seen = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = sock.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                seen.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&seen).to_string();
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let body_len = text[..head_end]
                        .lines()
                        .find_map(|l| {
                            let (k, v) = l.split_once(':')?;
                            k.eq_ignore_ascii_case("content-length")
                                .then(|| v.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if seen.len() >= head_end + 4 + body_len {
                        break;
                    }
                }
            }
            let body = r#"{"status":{"error":"alias rejected"}}"#;
            let reply = format!(
                "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            sock.write_all(reply.as_bytes()).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn local_http() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    fn cfg_with_rest(rest_url: String) -> RagConfig {
        let mut cfg = RagConfig::default();
        cfg.qdrant.rest_url = rest_url;
        cfg
    }

    #[tokio::test]
    async fn alias_swap_reports_rejected_request() {
        let cfg = cfg_with_rest(answer_once("HTTP/1.1 400 Bad Request").await);
        let http = local_http();

        let err = swap_alias(&http, &cfg, "wafam_knowledge_1", true)
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("HTTP 400"), "{msg}");
        assert!(msg.contains("alias rejected"), "{msg}");
    }

    #[tokio::test]
    async fn alias_swap_accepts_success() {
        let cfg = cfg_with_rest(answer_once("HTTP/1.1 200 OK").await);
        let http = local_http();

        swap_alias(&http, &cfg, "wafam_knowledge_1", false)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn failed_swap_after_legacy_removal_says_no_index() {
        let http = local_http();

        let cfg = cfg_with_rest(answer_once("HTTP/1.1 500 Internal Server Error").await);
        let err = point_alias(&http, &cfg, "wafam_knowledge_2", false, true)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no index is served"));

        let cfg = cfg_with_rest(answer_once("HTTP/1.1 500 Internal Server Error").await);
        let err = point_alias(&http, &cfg, "wafam_knowledge_2", true, false)
            .await
            .unwrap_err();
        assert!(!err.to_string().contains("no index is served"));
    }

    #[tokio::test]
    async fn mismatched_vectors_are_rejected_before_connecting() {
        let cfg = RagConfig::default();
        let chunk = KnowledgeChunk::new("okna", "Okna", "Okna PCV.".to_string());

        let err = publish_index(&cfg, &[chunk], Vec::new()).await.unwrap_err();
        assert!(matches!(err, RagBaseError::InvalidConfig(_)));
    }
}
