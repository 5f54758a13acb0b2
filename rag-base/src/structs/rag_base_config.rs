//! Configuration layer: reads runtime settings from environment variables
//! and exposes strongly typed configs for the chunk file, embeddings and Qdrant.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::rag_base_error::RagBaseError;

/// Distance metric supported by Qdrant for primary vector space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum DistanceMetric {
    Cosine,
    Dot,
    Euclid,
}

impl DistanceMetric {
    /// Parse from env string (case-insensitive). Defaults to Cosine.
    pub fn from_env(s: Option<String>) -> Self {
        match s
            .unwrap_or_else(|| "Cosine".to_string())
            .to_lowercase()
            .as_str()
        {
            "cosine" => DistanceMetric::Cosine,
            "dot" | "dotproduct" => DistanceMetric::Dot,
            "euclid" | "l2" => DistanceMetric::Euclid,
            _ => DistanceMetric::Cosine,
        }
    }
}

/// Qdrant connectivity and collection parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    /// gRPC URL for Qdrant (e.g., "http://localhost:6334").
    pub url: String,
    /// REST URL for Qdrant (e.g., "http://localhost:6333"), used for alias changes.
    pub rest_url: String,
    /// Alias the chat service searches; rebuilds create `<alias>_<millis>` collections behind it.
    pub collection: String,
    /// Vector distance metric (Cosine by default).
    pub distance: DistanceMetric,
    /// Batch size for embeddings requests and upserts.
    pub batch_size: usize,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6334".to_string(),
            rest_url: "http://localhost:6333".to_string(),
            collection: "wafam_knowledge".to_string(),
            distance: DistanceMetric::Cosine,
            batch_size: 64,
        }
    }
}

/// Top-level runtime configuration for the knowledge index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    /// JSON array of knowledge chunks produced by `knowledge-prep`.
    pub chunks_path: PathBuf,
    /// Embedding vector dimensionality (1536 for text-embedding-3-small).
    pub embedding_dim: usize,
    /// Qdrant connectivity & collection settings.
    pub qdrant: QdrantConfig,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunks_path: PathBuf::from("data/wafam_chunks.json"),
            embedding_dim: 1536,
            qdrant: QdrantConfig::default(),
        }
    }
}

impl RagConfig {
    /// Build configuration from environment variables.
    ///
    /// Environment variables used:
    /// - `CHUNKS_PATH` (default: `data/wafam_chunks.json`)
    /// - `EMBEDDING_DIM` (default: 1536)
    /// - `QDRANT_URL` (default: "http://localhost:6334")
    /// - `QDRANT_REST_URL` (default: "http://localhost:6333")
    /// - `QDRANT_COLLECTION` (default: "wafam_knowledge")
    /// - `QDRANT_DISTANCE` (values: "Cosine" | "Dot" | "Euclid"; default: "Cosine")
    /// - `QDRANT_BATCH_SIZE` (default: 64)
    pub fn from_env() -> Result<Self, RagBaseError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as [`RagConfig::from_env`] with an injectable key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RagBaseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = RagConfig::default();

        let chunks_path = lookup("CHUNKS_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.chunks_path);

        let embedding_dim =
            read_usize(&lookup, "EMBEDDING_DIM")?.unwrap_or(defaults.embedding_dim);

        let qdrant = QdrantConfig {
            url: lookup("QDRANT_URL").unwrap_or(defaults.qdrant.url),
            rest_url: lookup("QDRANT_REST_URL").unwrap_or(defaults.qdrant.rest_url),
            collection: lookup("QDRANT_COLLECTION").unwrap_or(defaults.qdrant.collection),
            distance: DistanceMetric::from_env(lookup("QDRANT_DISTANCE")),
            batch_size: read_usize(&lookup, "QDRANT_BATCH_SIZE")?
                .unwrap_or(defaults.qdrant.batch_size),
        };

        // Basic validations
        if embedding_dim == 0 {
            return Err(RagBaseError::InvalidConfig(
                "EMBEDDING_DIM must be > 0".into(),
            ));
        }
        if qdrant.batch_size == 0 {
            return Err(RagBaseError::InvalidConfig(
                "QDRANT_BATCH_SIZE must be > 0".into(),
            ));
        }
        if qdrant.collection.trim().is_empty() {
            return Err(RagBaseError::InvalidConfig(
                "QDRANT_COLLECTION must not be empty".into(),
            ));
        }

        Ok(Self {
            chunks_path,
            embedding_dim,
            qdrant,
        })
    }
}

/// Read an optional `usize`, with parse errors mapped to `RagBaseError`.
fn read_usize<F>(lookup: &F, key: &str) -> Result<Option<usize>, RagBaseError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(v) if !v.trim().is_empty() => {
            v.trim()
                .parse::<usize>()
                .map(Some)
                .map_err(|_| RagBaseError::EnvParse {
                    key: key.into(),
                    value: v,
                })
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_env_is_empty() {
        let cfg = RagConfig::from_lookup(|_| None).unwrap();
        assert_eq!(cfg.chunks_path, PathBuf::from("data/wafam_chunks.json"));
        assert_eq!(cfg.embedding_dim, 1536);
        assert_eq!(cfg.qdrant.collection, "wafam_knowledge");
        assert_eq!(cfg.qdrant.distance, DistanceMetric::Cosine);
        assert_eq!(cfg.qdrant.rest_url, "http://localhost:6333");
    }

    #[test]
    fn overrides_and_validation() {
        let cfg = RagConfig::from_lookup(|k| match k {
            "QDRANT_DISTANCE" => Some("dot".into()),
            "EMBEDDING_DIM" => Some("3072".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(cfg.qdrant.distance, DistanceMetric::Dot);
        assert_eq!(cfg.embedding_dim, 3072);

        let err = RagConfig::from_lookup(|k| (k == "EMBEDDING_DIM").then(|| "0".to_string()));
        assert!(matches!(err, Err(RagBaseError::InvalidConfig(_))));

        let err = RagConfig::from_lookup(|k| (k == "QDRANT_BATCH_SIZE").then(|| "x".to_string()));
        assert!(matches!(err, Err(RagBaseError::EnvParse { .. })));
    }
}
