//! Embedding provider seam.
//!
//! Async is required because real providers perform HTTP requests. The index
//! only needs "text in, vector out"; the OpenAI profile from `ai-llm-service`
//! implements it, tests plug in deterministic fakes.

use std::{future::Future, pin::Pin};

use ai_llm_service::LlmServiceProfiles;

use crate::errors::rag_base_error::RagBaseError;

/// Boxed future returned by [`EmbeddingsProvider`] methods.
pub type EmbedFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RagBaseError>> + Send + 'a>>;

/// Provider interface for embedding generation.
pub trait EmbeddingsProvider: Send + Sync {
    /// Embed a single text (used for queries).
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a, Vec<f32>>;

    /// Embed many texts, preserving order (used while indexing).
    fn embed_batch<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a, Vec<Vec<f32>>>;
}

impl EmbeddingsProvider for LlmServiceProfiles {
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a, Vec<f32>> {
        Box::pin(async move {
            LlmServiceProfiles::embed(self, text)
                .await
                .map_err(|e| RagBaseError::Embedding(e.to_string()))
        })
    }

    fn embed_batch<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a, Vec<Vec<f32>>> {
        Box::pin(async move {
            LlmServiceProfiles::embed_batch(self, texts)
                .await
                .map_err(|e| RagBaseError::Embedding(e.to_string()))
        })
    }
}

/// Embed `texts` in batches of `batch_size`, checking every vector against `dim`.
pub async fn embed_in_batches(
    embedder: &dyn EmbeddingsProvider,
    texts: &[String],
    batch_size: usize,
    dim: usize,
) -> Result<Vec<Vec<f32>>, RagBaseError> {
    let mut out = Vec::with_capacity(texts.len());

    for batch in texts.chunks(batch_size.max(1)) {
        let vectors = embedder.embed_batch(batch).await?;
        if vectors.len() != batch.len() {
            return Err(RagBaseError::Embedding(format!(
                "provider returned {} vectors for {} inputs",
                vectors.len(),
                batch.len()
            )));
        }
        for v in &vectors {
            check_dim(v, dim)?;
        }
        out.extend(vectors);
    }

    Ok(out)
}

/// Reject vectors whose length differs from the configured dimension.
pub fn check_dim(vector: &[f32], dim: usize) -> Result<(), RagBaseError> {
    if vector.len() != dim {
        return Err(RagBaseError::Embedding(format!(
            "embedding dim {} != expected {}",
            vector.len(),
            dim
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingEmbedder {
        calls: AtomicUsize,
        dim: usize,
    }

    impl EmbeddingsProvider for CountingEmbedder {
        fn embed<'a>(&'a self, _text: &'a str) -> EmbedFuture<'a, Vec<f32>> {
            Box::pin(async move { Ok(vec![0.0; self.dim]) })
        }

        fn embed_batch<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a, Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Box::pin(async move {
                Ok(texts
                    .iter()
                    .map(|t| vec![t.len() as f32; self.dim])
                    .collect())
            })
        }
    }

    #[tokio::test]
    async fn batches_preserve_order() {
        let emb = CountingEmbedder {
            calls: AtomicUsize::new(0),
            dim: 2,
        };
        let texts: Vec<String> = ["a", "bb", "ccc"].iter().map(|s| s.to_string()).collect();

        let out = embed_in_batches(&emb, &texts, 2, 2).await.unwrap();

        assert_eq!(out, vec![vec![1.0, 1.0], vec![2.0, 2.0], vec![3.0, 3.0]]);
        assert_eq!(emb.calls.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn wrong_dimension_aborts() {
        let emb = CountingEmbedder {
            calls: AtomicUsize::new(0),
            dim: 3,
        };
        let texts = vec!["a".to_string()];
        let err = embed_in_batches(&emb, &texts, 8, 1536).await.unwrap_err();
        assert!(matches!(err, RagBaseError::Embedding(_)));
    }
}
