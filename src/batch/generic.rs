//! Pairwise batch calculation with symmetry exploitation.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::error::BatchError;
use super::types::{BatchResult, SimilarityPair};
use super::{bounded_join, validate_batch, BatchCalculator};
use crate::options::SimilarityOptions;
use crate::strategies::{StrategyKind, StrategyRegistry};

/// Invokes the leaf strategy once per upper-triangle pair and mirrors the
/// result; the diagonal is fixed at 1.0.
///
/// Oversized batches are split into contiguous chunks, each scored as an
/// independent dense block. Cross-chunk pairs are left at similarity 0 — a
/// documented approximation; do not change it without sign-off, since
/// downstream dedup relies on the current semantics.
///
/// `supports` advertises the non-embedding kinds this calculator is meant
/// for, but `calculate` executes any kind with a registered implementation;
/// the adaptive dispatcher leans on that for small semantic batches.
pub struct GenericBatchCalculator {
    registry: Arc<StrategyRegistry>,
}

impl std::fmt::Debug for GenericBatchCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenericBatchCalculator")
            .field("registry", &self.registry)
            .finish()
    }
}

impl GenericBatchCalculator {
    pub fn new(registry: Arc<StrategyRegistry>) -> Self {
        Self { registry }
    }

    /// Contiguous chunk ranges covering `0..n`.
    fn chunk_ranges(&self, n: usize) -> Vec<(usize, usize)> {
        let chunk_size = self.recommended_batch_size(n);
        let mut ranges = Vec::new();
        let mut start = 0;
        while start < n {
            let end = (start + chunk_size).min(n);
            ranges.push((start, end));
            start = end;
        }
        ranges
    }
}

#[async_trait]
impl BatchCalculator for GenericBatchCalculator {
    async fn calculate(
        &self,
        contents: &[String],
        kind: StrategyKind,
        options: &SimilarityOptions,
    ) -> Result<BatchResult, BatchError> {
        let threshold = validate_batch(contents, options)?;

        let strategy =
            self.registry
                .get(kind)
                .ok_or(BatchError::StrategyNotSupported {
                    kind,
                    calculator: "generic",
                })?;

        let started = Instant::now();
        let n = contents.len();
        let mut matrix = BatchResult::identity_matrix(n);
        let mut cache_hits = 0usize;

        let ranges = self.chunk_ranges(n);
        if ranges.len() > 1 {
            warn!(
                count = n,
                chunks = ranges.len(),
                "Batch exceeds chunk size; cross-chunk pairs are approximated as 0"
            );
        }

        for (start, end) in ranges {
            // Upper triangle within the chunk; identical contents short-circuit.
            let tasks: Vec<_> = (start..end)
                .flat_map(|i| ((i + 1)..end).map(move |j| (i, j)))
                .map(|(i, j)| {
                    let strategy = strategy.clone();
                    async move {
                        if contents[i] == contents[j] {
                            return (i, j, Ok(crate::strategies::StrategyScore::computed(1.0)));
                        }
                        let result = strategy.calculate(&contents[i], &contents[j], options).await;
                        (i, j, result)
                    }
                })
                .collect();

            for (i, j, result) in bounded_join(tasks).await {
                let score = result?;
                if score.cache_hit {
                    cache_hits += 1;
                }
                matrix[i][j] = score.similarity;
                matrix[j][i] = score.similarity;
            }
        }

        let pairs: Vec<SimilarityPair> = BatchResult::pairs_over_threshold(&matrix, threshold);

        debug!(
            count = n,
            %kind,
            pairs = pairs.len(),
            "Generic batch complete"
        );

        Ok(BatchResult {
            matrix,
            pairs,
            execution_time_ms: started.elapsed().as_secs_f64() * 1000.0,
            cache_hits,
        })
    }

    fn supports(&self, kind: StrategyKind) -> bool {
        matches!(
            kind,
            StrategyKind::Levenshtein | StrategyKind::Keyword | StrategyKind::Structure
        )
    }

    fn recommended_batch_size(&self, n: usize) -> usize {
        match n {
            0..=20 => n.max(1),
            21..=100 => 50,
            101..=500 => 100,
            _ => 200,
        }
    }
}
