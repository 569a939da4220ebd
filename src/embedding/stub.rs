//! Deterministic embedder for tests and offline runs.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::debug;

use super::error::EmbeddingError;
use super::Embedder;
use crate::constants::DEFAULT_EMBEDDING_DIM;

/// Hash-seeded embedder producing stable, normalized vectors.
///
/// Identical texts always map to identical vectors, so similarity math over
/// stub embeddings behaves like the real thing: equal texts score 1.0 and
/// unrelated texts score low. Tracks bulk-call counts so tests can assert the
/// batch path collapses embedding traffic.
pub struct StubEmbedder {
    dimensions: usize,
    bulk_calls: AtomicU64,
    texts_embedded: AtomicU64,
}

impl std::fmt::Debug for StubEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StubEmbedder")
            .field("dimensions", &self.dimensions)
            .field("bulk_calls", &self.bulk_calls.load(Ordering::Relaxed))
            .finish()
    }
}

impl StubEmbedder {
    /// Creates a stub with the default dimension.
    pub fn new() -> Self {
        Self::with_dimensions(DEFAULT_EMBEDDING_DIM)
    }

    /// Creates a stub emitting vectors of `dimensions` length.
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions,
            bulk_calls: AtomicU64::new(0),
            texts_embedded: AtomicU64::new(0),
        }
    }

    /// Number of `embed` calls made so far.
    pub fn bulk_calls(&self) -> u64 {
        self.bulk_calls.load(Ordering::Relaxed)
    }

    /// Total texts embedded across all calls.
    pub fn texts_embedded(&self) -> u64 {
        self.texts_embedded.load(Ordering::Relaxed)
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let seed = hasher.finish();

        let mut embedding = Vec::with_capacity(self.dimensions);
        let mut state = seed;

        for _ in 0..self.dimensions {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }

        embedding
    }
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        self.bulk_calls.fetch_add(1, Ordering::Relaxed);
        self.texts_embedded
            .fetch_add(texts.len() as u64, Ordering::Relaxed);

        debug!(count = texts.len(), "Generating stub embeddings");

        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }

    fn model_name(&self) -> &str {
        "stub-embedder"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
