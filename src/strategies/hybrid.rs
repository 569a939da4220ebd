//! Weighted blend of the leaf strategies.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::{Strategy, StrategyError, StrategyKind, StrategyScore};
use crate::analysis::ContentType;
use crate::options::SimilarityOptions;

/// Blends levenshtein, semantic, and keyword scores.
///
/// Sub-strategies run concurrently; one failing never cancels the others. A
/// failed sub-strategy contributes 0 with its weight kept in the denominator,
/// so partial failure lowers the blend instead of inflating the survivors.
pub struct HybridStrategy {
    levenshtein: Arc<dyn Strategy>,
    semantic: Arc<dyn Strategy>,
    keyword: Arc<dyn Strategy>,
    subs: Vec<Arc<dyn Strategy>>,
}

impl std::fmt::Debug for HybridStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridStrategy")
            .field("subs", &self.subs.iter().map(|s| s.kind()).collect::<Vec<_>>())
            .finish()
    }
}

impl HybridStrategy {
    /// Builds the composite from its three constituents.
    pub fn new(
        levenshtein: Arc<dyn Strategy>,
        semantic: Arc<dyn Strategy>,
        keyword: Arc<dyn Strategy>,
    ) -> Self {
        let subs = vec![levenshtein.clone(), semantic.clone(), keyword.clone()];
        Self {
            levenshtein,
            semantic,
            keyword,
            subs,
        }
    }

    fn component(
        result: Result<StrategyScore, StrategyError>,
        kind: StrategyKind,
        weight: f32,
    ) -> (f32, bool) {
        match result {
            Ok(score) => (weight * score.similarity, score.cache_hit),
            Err(error) => {
                warn!(strategy = %kind, %error, "Hybrid sub-strategy failed, contributing 0");
                (0.0, false)
            }
        }
    }
}

#[async_trait]
impl Strategy for HybridStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Hybrid
    }

    async fn calculate(
        &self,
        content1: &str,
        content2: &str,
        options: &SimilarityOptions,
    ) -> Result<StrategyScore, StrategyError> {
        let weights = options.weights.unwrap_or_default().normalized();

        let (lev, sem, key) = tokio::join!(
            self.levenshtein.calculate(content1, content2, options),
            self.semantic.calculate(content1, content2, options),
            self.keyword.calculate(content1, content2, options),
        );

        let (lev_score, lev_hit) =
            Self::component(lev, StrategyKind::Levenshtein, weights.content);
        let (sem_score, sem_hit) = Self::component(sem, StrategyKind::Semantic, weights.semantic);
        let (key_score, key_hit) = Self::component(key, StrategyKind::Keyword, weights.keywords);

        // Normalized weights sum to 1, so the blend is already the weighted
        // average.
        let similarity = (lev_score + sem_score + key_score).clamp(0.0, 1.0);

        Ok(StrategyScore {
            similarity,
            cache_hit: lev_hit || sem_hit || key_hit,
        })
    }

    fn is_supported(&self, content_type: ContentType, language: Option<&str>) -> bool {
        self.subs
            .iter()
            .all(|sub| sub.is_supported(content_type, language))
    }

    fn default_threshold(&self) -> f32 {
        0.7
    }

    fn sub_strategies(&self) -> Option<&[Arc<dyn Strategy>]> {
        Some(&self.subs)
    }
}
