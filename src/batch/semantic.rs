//! Embedding-optimized batch calculation.
//!
//! The pairwise semantic path costs one embedding call per pair; this
//! calculator partitions contents into cache hits and misses, issues exactly
//! one bulk embedding request for all misses (chunked only above the API
//! batch cap), and then computes the full cosine matrix locally.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, warn};

use super::error::BatchError;
use super::types::BatchResult;
use super::{validate_batch, BatchCalculator};
use crate::cache::CacheStore;
use crate::constants::{DEFAULT_MAX_EMBED_BATCH, EMBEDDING_CACHE_TTL_SECS};
use crate::embedding::{cosine_similarity, validate_embedding_dim, EmbedderRegistry};
use crate::hashing::{hash_embedding_key, hash_to_hex};
use crate::options::SimilarityOptions;
use crate::strategies::StrategyKind;

pub struct SemanticBatchCalculator {
    embedders: Arc<EmbedderRegistry>,
    cache: Option<Arc<dyn CacheStore>>,
    cache_ttl: Duration,
    max_embed_batch: usize,
}

impl std::fmt::Debug for SemanticBatchCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticBatchCalculator")
            .field("embedders", &self.embedders)
            .field("cached", &self.cache.is_some())
            .field("max_embed_batch", &self.max_embed_batch)
            .finish()
    }
}

impl SemanticBatchCalculator {
    pub fn new(embedders: Arc<EmbedderRegistry>, cache: Option<Arc<dyn CacheStore>>) -> Self {
        Self {
            embedders,
            cache,
            cache_ttl: Duration::from_secs(EMBEDDING_CACHE_TTL_SECS),
            max_embed_batch: DEFAULT_MAX_EMBED_BATCH,
        }
    }

    /// Overrides the per-request embedding batch cap.
    pub fn with_max_embed_batch(mut self, max: usize) -> Self {
        self.max_embed_batch = max.max(1);
        self
    }

    fn cache_key(content: &str, model: &str) -> String {
        format!("emb:{}:{}", model, hash_to_hex(&hash_embedding_key(content, model)))
    }

    async fn cached_vector(&self, key: &str) -> Option<Vec<f32>> {
        let cache = self.cache.as_deref()?;
        match cache.get(key).await {
            Ok(Some(bytes)) => serde_json::from_slice(&bytes).ok(),
            Ok(None) => None,
            Err(error) => {
                warn!(key, %error, "Embedding cache read failed");
                None
            }
        }
    }
}

#[async_trait]
impl BatchCalculator for SemanticBatchCalculator {
    async fn calculate(
        &self,
        contents: &[String],
        kind: StrategyKind,
        options: &SimilarityOptions,
    ) -> Result<BatchResult, BatchError> {
        if kind != StrategyKind::Semantic {
            return Err(BatchError::StrategyNotSupported {
                kind,
                calculator: "semantic-optimized",
            });
        }

        let threshold = validate_batch(contents, options)?;
        let started = Instant::now();

        let embedder = self.embedders.get(options.embedder_provider.as_deref())?;
        let model = embedder.model_name().to_owned();
        let dimensions = embedder.dimensions();

        // Partition distinct contents into cache hits and misses.
        let mut vectors: HashMap<&str, Vec<f32>> = HashMap::new();
        let mut cache_hits = 0usize;
        let mut misses: Vec<&str> = Vec::new();

        for content in contents {
            let content = content.as_str();
            if vectors.contains_key(content) || misses.contains(&content) {
                continue;
            }
            let key = Self::cache_key(content, &model);
            match self.cached_vector(&key).await {
                Some(vector) => {
                    cache_hits += 1;
                    vectors.insert(content, vector);
                }
                None => misses.push(content),
            }
        }

        // One bulk request covers every miss; only batches beyond the API cap
        // are chunked.
        for chunk in misses.chunks(self.max_embed_batch) {
            let texts: Vec<String> = chunk.iter().map(|s| (*s).to_owned()).collect();
            let fresh = embedder.embed(&texts).await?;

            if fresh.len() != texts.len() {
                return Err(BatchError::Embedding(
                    crate::embedding::EmbeddingError::InvalidResponse {
                        reason: format!("expected {} vectors, got {}", texts.len(), fresh.len()),
                    },
                ));
            }

            for (content, vector) in chunk.iter().zip(fresh) {
                validate_embedding_dim(vector.len(), dimensions)?;

                if let Some(cache) = self.cache.as_deref() {
                    let key = Self::cache_key(content, &model);
                    match serde_json::to_vec(&vector) {
                        Ok(bytes) => {
                            if let Err(error) = cache.set(&key, bytes, Some(self.cache_ttl)).await {
                                warn!(key, %error, "Embedding cache write failed");
                            }
                        }
                        Err(error) => warn!(%error, "Embedding serialization failed"),
                    }
                }

                vectors.insert(content, vector);
            }
        }

        // Full pairwise cosine matrix, computed locally.
        let n = contents.len();
        let mut matrix = BatchResult::identity_matrix(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let similarity = if contents[i] == contents[j] {
                    1.0
                } else {
                    cosine_similarity(&vectors[contents[i].as_str()], &vectors[contents[j].as_str()])
                };
                matrix[i][j] = similarity;
                matrix[j][i] = similarity;
            }
        }

        let pairs = BatchResult::pairs_over_threshold(&matrix, threshold);

        debug!(
            count = n,
            distinct = vectors.len(),
            cache_hits,
            "Semantic batch complete"
        );

        Ok(BatchResult {
            matrix,
            pairs,
            execution_time_ms: started.elapsed().as_secs_f64() * 1000.0,
            cache_hits,
        })
    }

    fn supports(&self, kind: StrategyKind) -> bool {
        kind == StrategyKind::Semantic
    }

    fn recommended_batch_size(&self, n: usize) -> usize {
        n.min(self.max_embed_batch).max(1)
    }
}
