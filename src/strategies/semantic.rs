//! Embedding-based semantic similarity.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::keyword::KeywordStrategy;
use super::{Strategy, StrategyError, StrategyKind, StrategyScore};
use crate::analysis::ContentType;
use crate::cache::CacheStore;
use crate::constants::{EMBEDDING_CACHE_TTL_SECS, SEMANTIC_MIN_CONTENT_LEN};
use crate::embedding::{cosine_similarity, EmbedderRegistry, EmbeddingError};
use crate::hashing::{hash_embedding_key, hash_to_hex};
use crate::options::SimilarityOptions;

/// Cosine similarity of embeddings from the configured backend.
///
/// Short inputs and embedding failures fall back to keyword overlap: a
/// degraded score beats a failed comparison, and the coordinator records the
/// fallback path the same as any other score.
pub struct SemanticStrategy {
    embedders: Arc<EmbedderRegistry>,
    cache: Option<Arc<dyn CacheStore>>,
    cache_ttl: Duration,
    fallback: KeywordStrategy,
}

impl std::fmt::Debug for SemanticStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticStrategy")
            .field("embedders", &self.embedders)
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

impl SemanticStrategy {
    /// Strategy with no embedding cache.
    pub fn new(embedders: Arc<EmbedderRegistry>) -> Self {
        Self {
            embedders,
            cache: None,
            cache_ttl: Duration::from_secs(EMBEDDING_CACHE_TTL_SECS),
            fallback: KeywordStrategy::new(),
        }
    }

    /// Strategy that memoizes embeddings in `cache`.
    pub fn with_cache(embedders: Arc<EmbedderRegistry>, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            embedders,
            cache: Some(cache),
            cache_ttl: Duration::from_secs(EMBEDDING_CACHE_TTL_SECS),
            fallback: KeywordStrategy::new(),
        }
    }

    fn cache_key(content: &str, model: &str) -> String {
        format!("emb:{}:{}", model, hash_to_hex(&hash_embedding_key(content, model)))
    }

    async fn cached_vector(&self, key: &str) -> Option<Vec<f32>> {
        let cache = self.cache.as_deref()?;
        match cache.get(key).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(vector) => Some(vector),
                Err(error) => {
                    warn!(key, %error, "Discarding undecodable cached embedding");
                    None
                }
            },
            Ok(None) => None,
            Err(error) => {
                warn!(key, %error, "Embedding cache read failed");
                None
            }
        }
    }

    async fn store_vector(&self, key: &str, vector: &[f32]) {
        let Some(cache) = self.cache.as_deref() else {
            return;
        };
        match serde_json::to_vec(vector) {
            Ok(bytes) => {
                if let Err(error) = cache.set(key, bytes, Some(self.cache_ttl)).await {
                    warn!(key, %error, "Embedding cache write failed");
                }
            }
            Err(error) => warn!(%error, "Embedding serialization failed"),
        }
    }

    /// Embeds both contents, batching cache misses into one backend call.
    ///
    /// Returns the two vectors plus whether both came from cache.
    async fn embeddings_for_pair(
        &self,
        content1: &str,
        content2: &str,
        provider: Option<&str>,
    ) -> Result<(Vec<f32>, Vec<f32>, bool), EmbeddingError> {
        let embedder = self.embedders.get(provider)?;
        let model = embedder.model_name().to_owned();

        let key1 = Self::cache_key(content1, &model);
        let key2 = Self::cache_key(content2, &model);

        let cached1 = self.cached_vector(&key1).await;
        let cached2 = self.cached_vector(&key2).await;
        let all_cached = cached1.is_some() && cached2.is_some();

        let mut misses: Vec<String> = Vec::new();
        if cached1.is_none() {
            misses.push(content1.to_owned());
        }
        if cached2.is_none() && content2 != content1 {
            misses.push(content2.to_owned());
        }

        let mut fresh = if misses.is_empty() {
            Vec::new()
        } else {
            embedder.embed(&misses).await?
        };

        // Pop in reverse insertion order so indexes stay aligned.
        let vector2 = match cached2 {
            Some(vector) => vector,
            None if content2 == content1 && cached1.is_none() => fresh
                .first()
                .cloned()
                .ok_or(EmbeddingError::InvalidResponse {
                    reason: "backend returned no vectors".to_owned(),
                })?,
            None => fresh.pop().ok_or(EmbeddingError::InvalidResponse {
                reason: "backend returned too few vectors".to_owned(),
            })?,
        };
        let vector1 = match cached1 {
            Some(vector) => vector,
            None => fresh.pop().ok_or(EmbeddingError::InvalidResponse {
                reason: "backend returned too few vectors".to_owned(),
            })?,
        };

        self.store_vector(&key1, &vector1).await;
        if content2 != content1 {
            self.store_vector(&key2, &vector2).await;
        }

        Ok((vector1, vector2, all_cached))
    }

    async fn keyword_fallback(
        &self,
        content1: &str,
        content2: &str,
        options: &SimilarityOptions,
    ) -> Result<StrategyScore, StrategyError> {
        self.fallback.calculate(content1, content2, options).await
    }
}

#[async_trait]
impl Strategy for SemanticStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Semantic
    }

    async fn calculate(
        &self,
        content1: &str,
        content2: &str,
        options: &SimilarityOptions,
    ) -> Result<StrategyScore, StrategyError> {
        if content1.len() < SEMANTIC_MIN_CONTENT_LEN || content2.len() < SEMANTIC_MIN_CONTENT_LEN {
            debug!("Content below semantic minimum length, using keyword overlap");
            return self.keyword_fallback(content1, content2, options).await;
        }

        match self
            .embeddings_for_pair(content1, content2, options.embedder_provider.as_deref())
            .await
        {
            Ok((vector1, vector2, all_cached)) => {
                let similarity = cosine_similarity(&vector1, &vector2);
                Ok(StrategyScore {
                    similarity,
                    cache_hit: all_cached,
                })
            }
            Err(error) => {
                warn!(%error, "Embedding failed, falling back to keyword overlap");
                self.keyword_fallback(content1, content2, options).await
            }
        }
    }

    fn is_supported(&self, _content_type: ContentType, _language: Option<&str>) -> bool {
        true
    }

    fn default_threshold(&self) -> f32 {
        0.75
    }
}
