//! Per-request options accepted by every inbound operation.

use serde::{Deserialize, Serialize};

use crate::analysis::ContentType;
use crate::strategies::StrategyKind;

/// Caller-supplied knobs for a comparison or batch request.
///
/// Every field is optional; unset fields fall back to analysis results,
/// threshold-manager state, or [`crate::config::Config`] defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityOptions {
    /// Skip content-type detection and treat both inputs as this type.
    pub content_type: Option<ContentType>,

    /// Source language hint. A known programming language forces `Code`.
    pub language: Option<String>,

    /// Decision threshold override. Must lie in `[0, 1]`.
    pub threshold: Option<f32>,

    /// Run exactly this strategy instead of the recommended sequence.
    pub strategy: Option<StrategyKind>,

    /// Hybrid blending weights (renormalized to sum 1).
    pub weights: Option<HybridWeights>,

    /// Embedding provider name for the semantic strategy.
    pub embedder_provider: Option<String>,
}

impl SimilarityOptions {
    /// Options pinned to a single strategy.
    pub fn with_strategy(kind: StrategyKind) -> Self {
        Self {
            strategy: Some(kind),
            ..Default::default()
        }
    }

    /// Options with a decision-threshold override.
    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            threshold: Some(threshold),
            ..Default::default()
        }
    }

    /// Stable fingerprint of these options for cache keys.
    ///
    /// serde_json emits struct fields in declaration order, so the encoding is
    /// deterministic for identical options.
    pub fn cache_fingerprint(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Blending weights for the hybrid strategy.
///
/// `content` weighs the edit-distance (levenshtein) component, matching the
/// request-facing field names; weights are renormalized before use so callers
/// may pass any non-negative values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HybridWeights {
    /// Weight of the content (edit-distance) component.
    pub content: f32,
    /// Weight of the semantic (embedding) component.
    pub semantic: f32,
    /// Weight of the keyword-overlap component.
    pub keywords: f32,
}

impl Default for HybridWeights {
    fn default() -> Self {
        Self {
            content: 0.4,
            semantic: 0.4,
            keywords: 0.2,
        }
    }
}

impl HybridWeights {
    /// Returns weights scaled to sum to 1.0.
    ///
    /// Non-positive totals fall back to the defaults rather than dividing by
    /// zero.
    pub fn normalized(&self) -> Self {
        let sum = self.content + self.semantic + self.keywords;
        if sum <= f32::EPSILON {
            return Self::default();
        }
        Self {
            content: self.content / sum,
            semantic: self.semantic / sum,
            keywords: self.keywords / sum,
        }
    }

    /// Weight for a given strategy kind, after normalization.
    pub fn weight_for(&self, kind: StrategyKind) -> f32 {
        let normalized = self.normalized();
        match kind {
            StrategyKind::Levenshtein | StrategyKind::Structure => normalized.content,
            StrategyKind::Semantic => normalized.semantic,
            StrategyKind::Keyword => normalized.keywords,
            StrategyKind::Hybrid => 0.0,
        }
    }
}
