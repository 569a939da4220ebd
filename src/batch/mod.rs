//! Batch similarity calculation.
//!
//! Pairwise strategy invocation is O(n²); the calculators here restructure
//! the work instead: the generic calculator exploits matrix symmetry, the
//! semantic calculator collapses embedding traffic into one bulk request,
//! the hybrid calculator computes sub-strategy matrices concurrently, and
//! the adaptive dispatcher picks among them per request.

mod adaptive;
mod error;
mod generic;
mod hybrid;
mod semantic;
mod types;


pub use adaptive::AdaptiveBatchCalculator;
pub use error::BatchError;
pub use generic::GenericBatchCalculator;
pub use hybrid::HybridBatchCalculator;
pub use semantic::SemanticBatchCalculator;
pub use types::{BatchProfile, BatchResult, SimilarityPair};

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};

use crate::cache::CacheStore;
use crate::constants::{BATCH_MAX_IN_FLIGHT, DEFAULT_DECISION_THRESHOLD};
use crate::embedding::EmbedderRegistry;
use crate::options::SimilarityOptions;
use crate::strategies::{StrategyKind, StrategyRegistry};

/// A bulk similarity calculator.
#[async_trait]
pub trait BatchCalculator: Send + Sync {
    /// Computes the full similarity matrix for `contents` under `kind`.
    async fn calculate(
        &self,
        contents: &[String],
        kind: StrategyKind,
        options: &SimilarityOptions,
    ) -> Result<BatchResult, BatchError>;

    /// Kinds this calculator is optimized for.
    fn supports(&self, kind: StrategyKind) -> bool;

    /// Recommended chunk size for a batch of `n` items.
    fn recommended_batch_size(&self, n: usize) -> usize;
}

/// Shared input validation: at least two contents, none empty, threshold in
/// range. Returns the effective decision threshold.
pub(crate) fn validate_batch(
    contents: &[String],
    options: &SimilarityOptions,
) -> Result<f32, BatchError> {
    if contents.len() < 2 {
        return Err(BatchError::InsufficientInput {
            count: contents.len(),
        });
    }

    if let Some(index) = contents.iter().position(|content| content.is_empty()) {
        return Err(BatchError::InvalidInput { index });
    }

    let threshold = options.threshold.unwrap_or(DEFAULT_DECISION_THRESHOLD);
    if !(0.0..=1.0).contains(&threshold) {
        return Err(BatchError::InvalidThreshold { value: threshold });
    }

    Ok(threshold)
}

/// Runs `tasks` with at most [`BATCH_MAX_IN_FLIGHT`] in flight.
///
/// Completion order is arbitrary; tasks carry their own indexes. New work is
/// admitted as units finish rather than all at once, which caps resource use
/// without a global queue.
pub(crate) async fn bounded_join<T, F>(tasks: Vec<F>) -> Vec<T>
where
    F: std::future::Future<Output = T> + Send,
    T: Send,
{
    stream::iter(tasks)
        .buffer_unordered(BATCH_MAX_IN_FLIGHT)
        .collect()
        .await
}

/// Builds and hands out batch calculators by strategy kind.
pub struct BatchCalculatorFactory {
    generic: Arc<GenericBatchCalculator>,
    semantic: Option<Arc<SemanticBatchCalculator>>,
    hybrid: Arc<HybridBatchCalculator>,
}

impl std::fmt::Debug for BatchCalculatorFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchCalculatorFactory")
            .field("semantic_optimized", &self.semantic.is_some())
            .finish()
    }
}

impl BatchCalculatorFactory {
    /// Assembles the calculator set over a strategy registry.
    ///
    /// The semantic-optimized calculator exists only when at least one
    /// embedder is registered; without one, semantic batches surface
    /// `MISSING_FACTORY`.
    pub fn new(
        registry: Arc<StrategyRegistry>,
        embedders: Arc<EmbedderRegistry>,
        cache: Option<Arc<dyn CacheStore>>,
    ) -> Self {
        Self::with_max_embed_batch(registry, embedders, cache, crate::constants::DEFAULT_MAX_EMBED_BATCH)
    }

    /// Like [`new`](Self::new), with an explicit bulk-embedding cap.
    pub fn with_max_embed_batch(
        registry: Arc<StrategyRegistry>,
        embedders: Arc<EmbedderRegistry>,
        cache: Option<Arc<dyn CacheStore>>,
        max_embed_batch: usize,
    ) -> Self {
        let generic = Arc::new(GenericBatchCalculator::new(registry.clone()));

        let semantic = embedders.has_providers().then(|| {
            Arc::new(
                SemanticBatchCalculator::new(embedders.clone(), cache.clone())
                    .with_max_embed_batch(max_embed_batch),
            )
        });

        let hybrid = Arc::new(HybridBatchCalculator::new(
            registry,
            generic.clone(),
            semantic.clone(),
        ));

        Self {
            generic,
            semantic,
            hybrid,
        }
    }

    /// Calculator optimized for `kind`.
    pub fn create(&self, kind: StrategyKind) -> Result<Arc<dyn BatchCalculator>, BatchError> {
        match kind {
            StrategyKind::Semantic => self
                .semantic
                .clone()
                .map(|calculator| calculator as Arc<dyn BatchCalculator>)
                .ok_or_else(|| BatchError::MissingFactory {
                    reason: "semantic batches require a configured embedder".to_owned(),
                }),
            StrategyKind::Hybrid => Ok(self.hybrid.clone()),
            _ => Ok(self.generic.clone()),
        }
    }

    /// The always-available pairwise fallback.
    pub fn generic(&self) -> Arc<GenericBatchCalculator> {
        self.generic.clone()
    }
}
