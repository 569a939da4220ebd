//! Adaptive batch dispatch.
//!
//! Profiles the batch, picks the best calculator per the dispatch table, and
//! falls back to the generic calculator once on failure before propagating.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::error::BatchError;
use super::types::{BatchProfile, BatchResult};
use super::{validate_batch, BatchCalculator, BatchCalculatorFactory};
use crate::analysis::{code_pattern_score, ComplexityLevel};
use crate::options::SimilarityOptions;
use crate::strategies::StrategyKind;

/// Dispatch bounds from the decision table.
const SEMANTIC_MIN_COUNT: usize = 3;
const SEMANTIC_MIN_AVG_LEN: usize = 10;
const HYBRID_MIN_COUNT: usize = 5;

/// Length thresholds bucketing batch complexity.
const COMPLEXITY_HIGH_AVG_LEN: usize = 1000;
const COMPLEXITY_MEDIUM_AVG_LEN: usize = 300;

pub struct AdaptiveBatchCalculator {
    factory: Arc<BatchCalculatorFactory>,
}

impl std::fmt::Debug for AdaptiveBatchCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdaptiveBatchCalculator")
            .field("factory", &self.factory)
            .finish()
    }
}

impl AdaptiveBatchCalculator {
    pub fn new(factory: Arc<BatchCalculatorFactory>) -> Self {
        Self { factory }
    }

    /// Derives the dispatch profile for a batch.
    pub fn analyze_batch(contents: &[String]) -> BatchProfile {
        let count = contents.len();
        let lengths: Vec<usize> = contents.iter().map(|content| content.len()).collect();
        let total: usize = lengths.iter().sum();
        let avg_length = if count == 0 { 0 } else { total / count };
        let max_length = lengths.iter().copied().max().unwrap_or(0);
        let min_length = lengths.iter().copied().min().unwrap_or(0);

        let complexity = if avg_length > COMPLEXITY_HIGH_AVG_LEN {
            ComplexityLevel::High
        } else if avg_length > COMPLEXITY_MEDIUM_AVG_LEN {
            ComplexityLevel::Medium
        } else {
            ComplexityLevel::Low
        };

        // Sample the first few items; a batch is either mostly code or not.
        let has_code_patterns = contents
            .iter()
            .take(5)
            .any(|content| code_pattern_score(content) >= 3);

        let high_special_density = contents.iter().take(5).any(|content| {
            let length = content.chars().count();
            if length == 0 {
                return false;
            }
            let special = content
                .chars()
                .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
                .count();
            special as f32 / length as f32 > 0.2
        });

        BatchProfile {
            count,
            avg_length,
            max_length,
            min_length,
            complexity,
            has_code_patterns,
            high_special_density,
        }
    }

    /// The dispatch table: which calculator serves this batch.
    fn dispatch(
        &self,
        kind: StrategyKind,
        profile: &BatchProfile,
    ) -> Result<Arc<dyn BatchCalculator>, BatchError> {
        match kind {
            StrategyKind::Semantic
                if profile.count > SEMANTIC_MIN_COUNT
                    && profile.avg_length > SEMANTIC_MIN_AVG_LEN =>
            {
                self.factory.create(StrategyKind::Semantic)
            }
            StrategyKind::Hybrid
                if profile.count > HYBRID_MIN_COUNT
                    && profile.complexity == ComplexityLevel::High =>
            {
                self.factory.create(StrategyKind::Hybrid)
            }
            _ => Ok(self.factory.generic() as Arc<dyn BatchCalculator>),
        }
    }
}

#[async_trait]
impl BatchCalculator for AdaptiveBatchCalculator {
    async fn calculate(
        &self,
        contents: &[String],
        kind: StrategyKind,
        options: &SimilarityOptions,
    ) -> Result<BatchResult, BatchError> {
        validate_batch(contents, options)?;

        let profile = Self::analyze_batch(contents);
        let calculator = match self.dispatch(kind, &profile) {
            Ok(calculator) => calculator,
            Err(error) => {
                // No optimized calculator available; the pairwise fallback is
                // the retry.
                warn!(%error, "Optimized calculator unavailable; using generic");
                self.factory.generic() as Arc<dyn BatchCalculator>
            }
        };

        debug!(
            %kind,
            count = profile.count,
            avg_length = profile.avg_length,
            complexity = ?profile.complexity,
            "Adaptive batch dispatch"
        );

        match calculator.calculate(contents, kind, options).await {
            Ok(result) => Ok(result),
            Err(error) => {
                // One retry on the pairwise fallback, then propagate.
                warn!(%error, "Optimized batch failed; retrying via generic calculator");
                self.factory
                    .generic()
                    .calculate(contents, kind, options)
                    .await
            }
        }
    }

    fn supports(&self, _kind: StrategyKind) -> bool {
        true
    }

    fn recommended_batch_size(&self, n: usize) -> usize {
        self.factory.generic().recommended_batch_size(n)
    }
}
