//! Public engine facade.
//!
//! [`SimilarityEngine`] wires the analyzer, planner, coordinator, and batch
//! subsystem together behind the five inbound operations an indexing/search
//! pipeline consumes: pairwise scoring, batch scoring, the boolean decision,
//! duplicate filtering, and similarity grouping.

mod error;

#[cfg(test)]
mod tests;

pub use error::EngineError;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::ContentAnalyzer;
use crate::batch::{
    AdaptiveBatchCalculator, BatchCalculator, BatchCalculatorFactory, BatchResult,
};
use crate::cache::{CacheStore, MemoryCache};
use crate::config::Config;
use crate::coordinator::{CoordinatorStats, SimilarityCoordinator, SimilarityReport};
use crate::embedding::{EmbedderRegistry, HttpEmbedder, HttpEmbedderConfig};
use crate::metrics::{MetricsSink, NoopMetrics};
use crate::options::SimilarityOptions;
use crate::planning::{PlanGenerator, StrategyCost};
use crate::strategies::{
    HybridStrategy, KeywordStrategy, LevenshteinStrategy, SemanticStrategy, Strategy,
    StrategyKind, StrategyRegistry,
};
use crate::thresholds::ThresholdManager;

/// One similarity cluster found by [`SimilarityEngine::find_similarity_groups`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarityGroup {
    pub id: usize,
    /// Indexes into the input slice, first-seen member first.
    pub member_indices: Vec<usize>,
}

/// Top-level similarity engine.
pub struct SimilarityEngine {
    coordinator: SimilarityCoordinator,
    planner: Arc<PlanGenerator>,
    adaptive: AdaptiveBatchCalculator,
}

impl std::fmt::Debug for SimilarityEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityEngine")
            .field("coordinator", &self.coordinator)
            .finish()
    }
}

impl SimilarityEngine {
    /// Starts building an engine.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Scores one content pair and decides whether it is a duplicate.
    pub async fn calculate_similarity(
        &self,
        content1: &str,
        content2: &str,
        options: &SimilarityOptions,
    ) -> Result<SimilarityReport, EngineError> {
        Ok(self.coordinator.calculate(content1, content2, options).await?)
    }

    /// Boolean convenience over [`calculate_similarity`](Self::calculate_similarity).
    pub async fn is_similar(
        &self,
        content1: &str,
        content2: &str,
        options: &SimilarityOptions,
    ) -> Result<bool, EngineError> {
        Ok(self
            .calculate_similarity(content1, content2, options)
            .await?
            .is_similar)
    }

    /// Computes the full similarity matrix for a batch of contents.
    ///
    /// The strategy comes from `options.strategy`, defaulting to hybrid; the
    /// adaptive dispatcher picks the cheapest capable calculator.
    pub async fn calculate_batch_similarity(
        &self,
        contents: &[String],
        options: &SimilarityOptions,
    ) -> Result<BatchResult, EngineError> {
        let kind = options.strategy.unwrap_or(StrategyKind::Hybrid);
        Ok(self.adaptive.calculate(contents, kind, options).await?)
    }

    /// Keeps the first-seen item of every similarity cluster.
    ///
    /// Fewer than two items pass through unchanged: there is nothing to
    /// compare.
    pub async fn filter_similar_items(
        &self,
        items: &[String],
        threshold: f32,
        options: &SimilarityOptions,
    ) -> Result<Vec<String>, EngineError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(EngineError::InvalidThreshold { value: threshold });
        }
        if items.len() < 2 {
            return Ok(items.to_vec());
        }

        let matrix = self.batch_matrix(items, threshold, options).await?;

        let mut kept_indices: Vec<usize> = Vec::new();
        let mut kept_items: Vec<String> = Vec::new();

        for (index, item) in items.iter().enumerate() {
            let duplicate = kept_indices
                .iter()
                .any(|&kept| matrix[kept][index] >= threshold);
            if !duplicate {
                kept_indices.push(index);
                kept_items.push(item.clone());
            }
        }

        info!(
            input = items.len(),
            kept = kept_items.len(),
            "Filtered similar items"
        );

        Ok(kept_items)
    }

    /// Clusters items by similarity; only clusters with at least two members
    /// are returned.
    ///
    /// Greedy single-link grouping over the batch matrix: each unassigned
    /// item seeds a group and absorbs every later unassigned item scoring at
    /// or above `threshold` against the seed.
    pub async fn find_similarity_groups(
        &self,
        items: &[String],
        threshold: f32,
        options: &SimilarityOptions,
    ) -> Result<Vec<SimilarityGroup>, EngineError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(EngineError::InvalidThreshold { value: threshold });
        }
        if items.len() < 2 {
            return Ok(Vec::new());
        }

        let matrix = self.batch_matrix(items, threshold, options).await?;

        let mut assigned: HashSet<usize> = HashSet::new();
        let mut groups: Vec<SimilarityGroup> = Vec::new();

        for seed in 0..items.len() {
            if assigned.contains(&seed) {
                continue;
            }

            let mut member_indices = vec![seed];
            for candidate in (seed + 1)..items.len() {
                if !assigned.contains(&candidate) && matrix[seed][candidate] >= threshold {
                    member_indices.push(candidate);
                }
            }

            if member_indices.len() >= 2 {
                for &member in &member_indices {
                    assigned.insert(member);
                }
                groups.push(SimilarityGroup {
                    id: groups.len(),
                    member_indices,
                });
            }
        }

        debug!(
            input = items.len(),
            groups = groups.len(),
            "Similarity grouping complete"
        );

        Ok(groups)
    }

    /// Rolling coordinator statistics.
    pub fn coordinator_stats(&self) -> CoordinatorStats {
        self.coordinator.stats()
    }

    /// Snapshot of the planner's strategy cost table.
    pub fn strategy_costs(&self) -> std::collections::HashMap<StrategyKind, StrategyCost> {
        self.planner.strategy_costs()
    }

    /// Recalibrates one strategy's cost entry.
    pub fn update_strategy_cost(&self, kind: StrategyKind, cost: StrategyCost) {
        self.planner.update_strategy_cost(kind, cost);
    }

    async fn batch_matrix(
        &self,
        items: &[String],
        threshold: f32,
        options: &SimilarityOptions,
    ) -> Result<Vec<Vec<f32>>, EngineError> {
        let batch_options = SimilarityOptions {
            threshold: Some(threshold),
            ..options.clone()
        };
        let kind = options.strategy.unwrap_or(StrategyKind::Hybrid);
        let result = self.adaptive.calculate(items, kind, &batch_options).await?;
        Ok(result.matrix)
    }
}

/// Assembles a [`SimilarityEngine`].
///
/// Every component has a working default: in-memory cache, no-op metrics, and
/// the bundled strategy set. Deployments add embedders (or point the config
/// at an HTTP endpoint) and register custom strategies as needed.
#[derive(Default)]
pub struct EngineBuilder {
    config: Option<Config>,
    cache: Option<Arc<dyn CacheStore>>,
    embedders: Option<EmbedderRegistry>,
    metrics: Option<Arc<dyn MetricsSink>>,
    extra_strategies: Vec<Arc<dyn Strategy>>,
}

impl EngineBuilder {
    /// Uses `config` instead of [`Config::default`].
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Swaps the cache collaborator.
    pub fn cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Installs a pre-populated embedder registry.
    pub fn embedders(mut self, embedders: EmbedderRegistry) -> Self {
        self.embedders = Some(embedders);
        self
    }

    /// Swaps the metrics sink.
    pub fn metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Registers an additional (or replacement) strategy implementation.
    pub fn strategy(mut self, strategy: Arc<dyn Strategy>) -> Self {
        self.extra_strategies.push(strategy);
        self
    }

    /// Builds the engine.
    pub fn build(self) -> Result<SimilarityEngine, EngineError> {
        let config = self.config.unwrap_or_default();
        config
            .validate()
            .map_err(|error| EngineError::InvalidInput {
                reason: error.to_string(),
            })?;

        let cache: Arc<dyn CacheStore> = self
            .cache
            .unwrap_or_else(|| Arc::new(MemoryCache::with_capacity(config.cache_capacity)));

        let mut embedders = self.embedders.unwrap_or_default();
        if let (Some(endpoint), Some(model)) =
            (config.embedding_endpoint.clone(), config.embedding_model.clone())
        {
            let http = HttpEmbedder::new(HttpEmbedderConfig {
                endpoint,
                model,
                api_key: config.embedding_api_key.clone(),
                dimensions: config.embedding_dimensions,
            })
            .map_err(|error| EngineError::InvalidInput {
                reason: error.to_string(),
            })?;
            embedders.register("http", Arc::new(http));
        }
        let embedders = Arc::new(embedders);

        let metrics = self.metrics.unwrap_or_else(|| Arc::new(NoopMetrics));
        let thresholds = Arc::new(ThresholdManager::new());

        let levenshtein = Arc::new(LevenshteinStrategy::new());
        let keyword = Arc::new(KeywordStrategy::new());
        let semantic = Arc::new(SemanticStrategy::with_cache(
            embedders.clone(),
            cache.clone(),
        ));
        let hybrid = Arc::new(HybridStrategy::new(
            levenshtein.clone(),
            semantic.clone(),
            keyword.clone(),
        ));

        let mut registry = StrategyRegistry::new();
        registry.register(levenshtein);
        registry.register(keyword);
        registry.register(semantic);
        registry.register(hybrid);
        for strategy in self.extra_strategies {
            registry.register(strategy);
        }
        let registry = Arc::new(registry);

        let analyzer = Arc::new(
            ContentAnalyzer::with_cache(cache.clone())
                .with_cache_ttl(Duration::from_secs(config.analysis_cache_ttl_secs)),
        );
        let planner = Arc::new(PlanGenerator::new(thresholds.clone(), registry.clone()));

        let coordinator = SimilarityCoordinator::new(
            analyzer,
            planner.clone(),
            registry.clone(),
            thresholds,
            metrics,
        );

        let factory = Arc::new(BatchCalculatorFactory::with_max_embed_batch(
            registry,
            embedders,
            Some(cache),
            config.max_embed_batch,
        ));
        let adaptive = AdaptiveBatchCalculator::new(factory);

        Ok(SimilarityEngine {
            coordinator,
            planner,
            adaptive,
        })
    }
}
