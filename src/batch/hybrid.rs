//! Hybrid-optimized batch calculation.
//!
//! Computes one full similarity matrix per sub-strategy concurrently, then
//! merges them with renormalized weights. The semantic sub-matrix goes
//! through the embedding-optimized path when one is configured; everything
//! else runs pairwise.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::{debug, warn};

use super::error::BatchError;
use super::generic::GenericBatchCalculator;
use super::semantic::SemanticBatchCalculator;
use super::types::BatchResult;
use super::{validate_batch, BatchCalculator};
use crate::options::SimilarityOptions;
use crate::strategies::{StrategyKind, StrategyRegistry};

/// Default merge weight for a sub-strategy kind.
fn default_sub_weight(kind: StrategyKind) -> f32 {
    match kind {
        StrategyKind::Levenshtein => 0.4,
        StrategyKind::Semantic => 0.4,
        StrategyKind::Keyword => 0.2,
        _ => 0.33,
    }
}

pub struct HybridBatchCalculator {
    registry: Arc<StrategyRegistry>,
    generic: Arc<GenericBatchCalculator>,
    semantic: Option<Arc<SemanticBatchCalculator>>,
}

impl std::fmt::Debug for HybridBatchCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridBatchCalculator")
            .field("semantic_optimized", &self.semantic.is_some())
            .finish()
    }
}

impl HybridBatchCalculator {
    pub fn new(
        registry: Arc<StrategyRegistry>,
        generic: Arc<GenericBatchCalculator>,
        semantic: Option<Arc<SemanticBatchCalculator>>,
    ) -> Self {
        Self {
            registry,
            generic,
            semantic,
        }
    }

    async fn sub_matrix(
        &self,
        contents: &[String],
        kind: StrategyKind,
        options: &SimilarityOptions,
    ) -> Result<BatchResult, BatchError> {
        if kind == StrategyKind::Semantic {
            if let Some(semantic) = &self.semantic {
                return semantic.calculate(contents, kind, options).await;
            }
        }
        self.generic.calculate(contents, kind, options).await
    }
}

#[async_trait]
impl BatchCalculator for HybridBatchCalculator {
    async fn calculate(
        &self,
        contents: &[String],
        kind: StrategyKind,
        options: &SimilarityOptions,
    ) -> Result<BatchResult, BatchError> {
        if kind != StrategyKind::Hybrid {
            return Err(BatchError::StrategyNotSupported {
                kind,
                calculator: "hybrid-optimized",
            });
        }

        let threshold = validate_batch(contents, options)?;

        let strategy = self
            .registry
            .get(StrategyKind::Hybrid)
            .ok_or(BatchError::StrategyNotSupported {
                kind: StrategyKind::Hybrid,
                calculator: "hybrid-optimized",
            })?;

        // The capability check: only composite strategies expose their parts.
        let subs = strategy
            .sub_strategies()
            .ok_or(BatchError::InvalidHybridStrategy)?;
        let sub_kinds: Vec<StrategyKind> = subs.iter().map(|sub| sub.kind()).collect();

        let started = Instant::now();

        // One matrix per sub-strategy, concurrently; a failure in one
        // sub-computation must not cancel the others.
        let futures = sub_kinds
            .iter()
            .map(|&sub_kind| self.sub_matrix(contents, sub_kind, options));
        let results = join_all(futures).await;

        let mut merged_weight = 0.0f32;
        let mut components: Vec<(StrategyKind, f32, BatchResult)> = Vec::new();
        let mut first_error: Option<BatchError> = None;

        for (sub_kind, result) in sub_kinds.iter().copied().zip(results) {
            match result {
                Ok(sub_result) => {
                    let weight = match options.weights {
                        Some(weights) => weights.weight_for(sub_kind),
                        None => default_sub_weight(sub_kind),
                    };
                    merged_weight += weight;
                    components.push((sub_kind, weight, sub_result));
                }
                Err(error) => {
                    warn!(strategy = %sub_kind, %error, "Sub-matrix failed; excluding from merge");
                    first_error.get_or_insert(error);
                }
            }
        }

        if components.is_empty() {
            // Every sub-computation failed; surface the first cause.
            return Err(first_error.unwrap_or(BatchError::InvalidHybridStrategy));
        }

        if merged_weight <= f32::EPSILON {
            return Err(BatchError::InvalidHybridStrategy);
        }

        // Weighted sum over surviving sub-matrices, renormalized.
        let n = contents.len();
        let mut matrix = BatchResult::identity_matrix(n);
        let mut cache_hits = 0usize;

        for (_, weight, sub_result) in &components {
            cache_hits += sub_result.cache_hits;
            let scale = weight / merged_weight;
            for i in 0..n {
                for j in (i + 1)..n {
                    matrix[i][j] += scale * sub_result.matrix[i][j];
                }
            }
        }
        for i in 0..n {
            for j in (i + 1)..n {
                let value = matrix[i][j].clamp(0.0, 1.0);
                matrix[i][j] = value;
                matrix[j][i] = value;
            }
        }

        let pairs = BatchResult::pairs_over_threshold(&matrix, threshold);

        debug!(
            count = n,
            merged = components.len(),
            of = sub_kinds.len(),
            "Hybrid batch complete"
        );

        Ok(BatchResult {
            matrix,
            pairs,
            execution_time_ms: started.elapsed().as_secs_f64() * 1000.0,
            cache_hits,
        })
    }

    fn supports(&self, kind: StrategyKind) -> bool {
        kind == StrategyKind::Hybrid
    }

    fn recommended_batch_size(&self, n: usize) -> usize {
        self.generic.recommended_batch_size(n)
    }
}
