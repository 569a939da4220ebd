//! Embedding-backend collaborator.
//!
//! The engine never runs models itself; it talks to an [`Embedder`] resolved
//! through the [`EmbedderRegistry`]. [`StubEmbedder`] generates deterministic
//! vectors for tests and offline runs; [`HttpEmbedder`] speaks an
//! OpenAI-style `/embeddings` endpoint.

mod error;
mod http;
mod registry;
mod stub;

#[cfg(test)]
mod tests;

pub use error::EmbeddingError;
pub use http::{HttpEmbedder, HttpEmbedderConfig};
pub use registry::EmbedderRegistry;
pub use stub::StubEmbedder;

use async_trait::async_trait;

/// Bulk embedding backend.
///
/// One call embeds many texts; callers batch aggressively and the engine's
/// semantic batch path collapses a whole request into a single `embed` call.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds every text, preserving input order.
    ///
    /// Implementations must return exactly one vector per input text, each of
    /// [`dimensions`](Embedder::dimensions) length.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Model identifier, used in embedding cache keys.
    fn model_name(&self) -> &str;

    /// Output vector dimension.
    fn dimensions(&self) -> usize;
}

/// Validates that a returned vector matches the backend's declared dimension.
///
/// Call at the seam right after an embed call; a mismatch this deep in the
/// pipeline would otherwise surface as a wrong similarity, not an error.
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), EmbeddingError> {
    if actual != expected {
        return Err(EmbeddingError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

/// Cosine similarity of two vectors, mapped into `[0, 1]`.
///
/// Raw cosine lies in `[-1, 1]`; scores below zero clamp to zero since
/// "opposite" embeddings carry no extra signal for dedup decisions.
/// Mismatched or zero-norm inputs score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a <= 0.0 || norm_b <= 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}
