//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants from primary ones to avoid drift.
//! Runtime overrides go through [`crate::config::Config`] or the planner's
//! cost table; these are the fallbacks every component agrees on.

/// Decision threshold used when neither the request nor the threshold manager
/// provides one.
pub const DEFAULT_DECISION_THRESHOLD: f32 = 0.75;

/// Default early-exit threshold: stop immediately at or above this similarity.
pub const DEFAULT_EARLY_EXIT_HIGH: f32 = 0.9;

/// Default early-exit threshold: stop here only when remaining cost is high.
pub const DEFAULT_EARLY_EXIT_MEDIUM: f32 = 0.7;

/// Default early-exit threshold: stop here only when remaining cost is very high.
pub const DEFAULT_EARLY_EXIT_LOW: f32 = 0.5;

/// Remaining summed `cost.total` required for a medium-similarity early exit.
pub const MEDIUM_EXIT_REMAINING_COST: f32 = 0.7;

/// Remaining summed `cost.total` required for a low-similarity early exit.
pub const LOW_EXIT_REMAINING_COST: f32 = 0.9;

/// Per-(content-type, strategy) adaptation history cap (oldest evicted first).
pub const ADAPTIVE_HISTORY_CAP: usize = 1000;

/// Minimum accumulated history entries before thresholds may adapt.
pub const ADAPTIVE_MIN_SAMPLES: usize = 10;

/// Number of most-recent history entries inspected per adaptation pass.
pub const ADAPTIVE_WINDOW: usize = 50;

/// Adapted thresholds are clamped to `[FLOOR, CEIL]`.
pub const ADAPTIVE_THRESHOLD_FLOOR: f32 = 0.3;
pub const ADAPTIVE_THRESHOLD_CEIL: f32 = 0.95;

/// Hysteresis: commit an adapted threshold only when it moved by more than this.
pub const ADAPTIVE_HYSTERESIS: f32 = 0.05;

/// Average execution time (ms) above which a strategy's threshold is eased.
pub const ADAPTIVE_SLOW_EXECUTION_MS: f64 = 1000.0;

/// Inputs shorter than this bypass the semantic strategy's embedding path.
pub const SEMANTIC_MIN_CONTENT_LEN: usize = 10;

/// Default cap on texts per bulk embedding request.
pub const DEFAULT_MAX_EMBED_BATCH: usize = 50;

/// Max in-flight units admitted by the batch subsystem's fan-out helper.
pub const BATCH_MAX_IN_FLIGHT: usize = 5;

/// TTL for cached content analyses (seconds).
pub const ANALYSIS_CACHE_TTL_SECS: u64 = 3600;

/// TTL for cached embedding vectors (seconds).
pub const EMBEDDING_CACHE_TTL_SECS: u64 = 86_400;

/// Inputs with an average length below this scale the plan's time estimate
/// down (x0.5).
pub const SHORT_CONTENT_LEN: usize = 200;

/// Inputs with an average length above this scale the plan's time estimate up
/// (x2.0; x2.5 when the plan includes a hybrid step).
pub const LONG_CONTENT_LEN: usize = 2000;

/// Embedding dimension assumed when a backend does not report one.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;
