//! Kindred: adaptive similarity coordination engine.
//!
//! Scores pairs and batches of text/code with interchangeable strategies and
//! decides whether they are duplicates. The interesting machinery is the
//! coordination layer, not any single metric: per request the engine
//! classifies the content, plans which strategies to run and in what order,
//! stops early when a result is decisive, blends partial results, tunes its
//! decision thresholds from observed outcomes, and amortizes embedding calls
//! across batches.
//!
//! # Public API Surface
//!
//! ## Entry Point
//! - [`SimilarityEngine`], [`EngineBuilder`] - facade over the whole pipeline
//! - [`SimilarityOptions`], [`HybridWeights`] - per-request knobs
//! - [`EngineError`] - stable-coded caller-facing errors
//!
//! ## Coordination
//! - [`SimilarityCoordinator`], [`SimilarityReport`], [`ExecutionDetails`] -
//!   one comparison end to end
//! - [`PlanGenerator`], [`ExecutionPlan`], [`StrategyCost`] - cost-aware
//!   planning
//! - [`ThresholdManager`], [`EarlyExitThresholds`] - adaptive thresholds
//! - [`ContentAnalyzer`], [`ContentAnalysisResult`] - input classification
//!
//! ## Strategies
//! - [`Strategy`], [`StrategyKind`], [`StrategyRegistry`] - the pluggable
//!   scorer seam
//! - [`LevenshteinStrategy`], [`KeywordStrategy`], [`SemanticStrategy`],
//!   [`HybridStrategy`] - bundled implementations
//!
//! ## Batch
//! - [`BatchCalculator`], [`BatchCalculatorFactory`], [`BatchResult`] - bulk
//!   scoring
//! - [`AdaptiveBatchCalculator`] - per-request dispatch
//!
//! ## Collaborators
//! - [`Embedder`], [`EmbedderRegistry`], [`HttpEmbedder`] - embedding backend
//! - [`CacheStore`], [`MemoryCache`] - key/value memoization
//! - [`MetricsSink`], [`NoopMetrics`], [`TracingMetrics`] - observability
//!
//! ## Test/Mock Support
//! [`StubEmbedder`] produces deterministic vectors; enable the `mock` feature
//! to use it outside this crate's own tests.

pub mod analysis;
pub mod batch;
pub mod cache;
pub mod config;
pub mod constants;
pub mod coordinator;
pub mod embedding;
pub mod engine;
pub mod hashing;
pub mod metrics;
pub mod options;
pub mod planning;
pub mod strategies;
pub mod thresholds;

pub use analysis::{
    ComplexityAssessment, ComplexityLevel, ContentAnalysisResult, ContentAnalyzer, ContentFeature,
    ContentType,
};
pub use batch::{
    AdaptiveBatchCalculator, BatchCalculator, BatchCalculatorFactory, BatchError, BatchProfile,
    BatchResult, GenericBatchCalculator, HybridBatchCalculator, SemanticBatchCalculator,
    SimilarityPair,
};
pub use cache::{CacheError, CacheStore, MemoryCache};
pub use config::{Config, ConfigError};
pub use coordinator::{
    CoordinationError, CoordinatorStats, ExecutionDetails, SimilarityCoordinator,
    SimilarityReport, StrategyExecutionResult,
};
pub use embedding::{
    cosine_similarity, Embedder, EmbedderRegistry, EmbeddingError, HttpEmbedder,
    HttpEmbedderConfig, StubEmbedder,
};
pub use engine::{EngineBuilder, EngineError, SimilarityEngine, SimilarityGroup};
pub use metrics::{MetricsSink, NoopMetrics, TracingMetrics};
pub use options::{HybridWeights, SimilarityOptions};
pub use planning::{
    ExecutionPlan, PlanError, PlanGenerator, StepCondition, StrategyCost, StrategyExecutionStep,
};
pub use strategies::{
    HybridStrategy, KeywordStrategy, LevenshteinStrategy, SemanticStrategy, Strategy,
    StrategyError, StrategyKind, StrategyRegistry, StrategyScore,
};
pub use thresholds::{EarlyExitThresholds, ExecutionOutcome, ThresholdManager};
