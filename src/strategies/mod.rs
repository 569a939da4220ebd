//! Leaf similarity strategies and their registry.
//!
//! Strategy kinds form a closed enum; implementations are registered once at
//! startup and resolved by kind. Unknown kinds are rejected when a plan is
//! generated, not when a step executes.

mod error;
mod hybrid;
mod keyword;
mod levenshtein;
mod semantic;

#[cfg(test)]
mod tests;

pub use error::StrategyError;
pub use hybrid::HybridStrategy;
pub use keyword::KeywordStrategy;
pub use levenshtein::LevenshteinStrategy;
pub use semantic::SemanticStrategy;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::analysis::ContentType;
use crate::options::SimilarityOptions;

/// Closed set of strategy kinds.
///
/// `Structure` is recognized for parsing and cost accounting but ships
/// without an implementation; registering one through the engine builder
/// makes it plannable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Levenshtein,
    Keyword,
    Semantic,
    Structure,
    Hybrid,
}

impl StrategyKind {
    /// All kinds, for iteration.
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::Levenshtein,
        StrategyKind::Keyword,
        StrategyKind::Semantic,
        StrategyKind::Structure,
        StrategyKind::Hybrid,
    ];

    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Levenshtein => "levenshtein",
            StrategyKind::Keyword => "keyword",
            StrategyKind::Semantic => "semantic",
            StrategyKind::Structure => "structure",
            StrategyKind::Hybrid => "hybrid",
        }
    }

    /// Returns `true` for kinds whose execution may perform I/O.
    pub fn uses_embeddings(&self) -> bool {
        matches!(self, StrategyKind::Semantic | StrategyKind::Hybrid)
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "levenshtein" => Ok(StrategyKind::Levenshtein),
            "keyword" => Ok(StrategyKind::Keyword),
            "semantic" => Ok(StrategyKind::Semantic),
            "structure" => Ok(StrategyKind::Structure),
            "hybrid" => Ok(StrategyKind::Hybrid),
            other => Err(format!("unknown strategy kind: {other}")),
        }
    }
}

/// Score produced by one strategy invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyScore {
    /// Similarity in `[0, 1]`.
    pub similarity: f32,
    /// `true` when the score was served from cached intermediate state
    /// (e.g. cached embeddings) rather than full recomputation.
    pub cache_hit: bool,
}

impl StrategyScore {
    pub fn computed(similarity: f32) -> Self {
        Self {
            similarity,
            cache_hit: false,
        }
    }

    pub fn cached(similarity: f32) -> Self {
        Self {
            similarity,
            cache_hit: true,
        }
    }
}

/// A pluggable similarity scorer.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// The kind this implementation registers under.
    fn kind(&self) -> StrategyKind;

    /// Scores one content pair. Must be symmetric in its arguments.
    async fn calculate(
        &self,
        content1: &str,
        content2: &str,
        options: &SimilarityOptions,
    ) -> Result<StrategyScore, StrategyError>;

    /// Whether this strategy is applicable to the given content.
    fn is_supported(&self, content_type: ContentType, language: Option<&str>) -> bool;

    /// Decision threshold recommended by this strategy alone.
    fn default_threshold(&self) -> f32;

    /// Constituent strategies, implemented only by composites.
    ///
    /// The hybrid batch path requires this capability; leaf strategies keep
    /// the default `None`.
    fn sub_strategies(&self) -> Option<&[Arc<dyn Strategy>]> {
        None
    }
}

/// Kind-to-implementation mapping, assembled once at startup.
#[derive(Default)]
pub struct StrategyRegistry {
    strategies: HashMap<StrategyKind, Arc<dyn Strategy>>,
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl StrategyRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `strategy` under its own kind, replacing any previous entry.
    pub fn register(&mut self, strategy: Arc<dyn Strategy>) {
        self.strategies.insert(strategy.kind(), strategy);
    }

    /// Resolves an implementation by kind.
    pub fn get(&self, kind: StrategyKind) -> Option<Arc<dyn Strategy>> {
        self.strategies.get(&kind).cloned()
    }

    /// Returns `true` when `kind` has a registered implementation.
    pub fn contains(&self, kind: StrategyKind) -> bool {
        self.strategies.contains_key(&kind)
    }

    /// Registered kinds, sorted by name for stable output.
    pub fn kinds(&self) -> Vec<StrategyKind> {
        let mut kinds: Vec<_> = self.strategies.keys().copied().collect();
        kinds.sort_by_key(|kind| kind.as_str());
        kinds
    }
}
