use serde::{Deserialize, Serialize};

use crate::planning::ExecutionPlan;
use crate::strategies::StrategyKind;
use crate::thresholds::ExecutionOutcome;

/// Exit reason recorded when byte-identical inputs skip planning entirely.
pub const EXIT_IDENTICAL_CONTENT: &str = "identical_content";

/// Exit reason for a decisive high-similarity result.
pub const EXIT_HIGH_SIMILARITY: &str = "High similarity";

/// Exit reason for a medium result not worth the remaining expensive steps.
pub const EXIT_MEDIUM_SIMILARITY: &str = "Medium similarity with high remaining cost";

/// Exit reason for a low result with a very expensive remainder.
pub const EXIT_LOW_SIMILARITY: &str = "Low similarity with very high remaining cost";

/// Record of one executed strategy step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyExecutionResult {
    pub strategy: StrategyKind,
    pub similarity: f32,
    pub execution_time_ms: f64,
    pub success: bool,
    pub error: Option<String>,
    pub cache_hit: bool,
    /// Aggregation weight copied from the plan step.
    pub weight: f32,
}

impl StrategyExecutionResult {
    /// Projects this record into the threshold manager's input shape.
    pub fn outcome(&self) -> ExecutionOutcome {
        ExecutionOutcome {
            success: self.success,
            similarity: self.similarity,
            execution_time_ms: self.execution_time_ms,
        }
    }
}

/// Execution metadata for one coordinated comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionDetails {
    pub total_execution_time_ms: f64,
    /// Strategies actually invoked (successes and failures; skipped steps
    /// excluded).
    pub executed_strategies: usize,
    pub early_exit: bool,
    pub exit_reason: Option<String>,
    pub cache_hits: usize,
    pub errors: Vec<String>,
}

/// Terminal output of one coordinated comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityReport {
    pub similarity: f32,
    pub is_similar: bool,
    pub threshold: f32,
    /// `None` only on the identical-content fast path, which skips planning.
    pub execution_plan: Option<ExecutionPlan>,
    pub execution: ExecutionDetails,
    pub strategy_results: Vec<StrategyExecutionResult>,
}
