use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cost::StrategyCost;
use crate::analysis::ContentAnalysisResult;
use crate::strategies::StrategyKind;
use crate::thresholds::EarlyExitThresholds;

/// Gate evaluated against the previous step's similarity before a step runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepCondition {
    /// Skip the step when the previous similarity is below this.
    pub min_previous: Option<f32>,
    /// Skip the step when the previous similarity is above this.
    pub max_previous: Option<f32>,
}

impl StepCondition {
    /// Returns `true` when `previous` satisfies the gate.
    ///
    /// With no previous result the gate is open: conditions only prune work
    /// that earlier steps have already made redundant.
    pub fn is_met(&self, previous: Option<f32>) -> bool {
        let Some(previous) = previous else {
            return true;
        };
        if matches!(self.min_previous, Some(min) if previous < min) {
            return false;
        }
        if matches!(self.max_previous, Some(max) if previous > max) {
            return false;
        }
        true
    }
}

/// One entry in a plan's strategy sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyExecutionStep {
    pub strategy: StrategyKind,
    /// Dense 0-based position in the sequence.
    pub order: usize,
    pub cost: StrategyCost,
    /// Required steps always run; optional steps may be gated.
    pub required: bool,
    pub condition: Option<StepCondition>,
    /// Aggregation weight, seeded from the threshold manager's
    /// content-type-specific decision threshold for this strategy.
    pub weight: f32,
}

/// Ordered, cost-annotated plan for one comparison.
///
/// Plans are immutable once generated; the coordinator consumes each exactly
/// once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub id: Uuid,
    pub content_analysis: ContentAnalysisResult,
    pub strategy_sequence: Vec<StrategyExecutionStep>,
    pub early_exit_thresholds: EarlyExitThresholds,
    pub estimated_execution_time_ms: f64,
    pub created_at: DateTime<Utc>,
}

impl ExecutionPlan {
    /// Summed `cost.total` of the steps after `index`.
    ///
    /// Drives the early-exit decision: a moderate similarity justifies
    /// stopping only when what remains is expensive.
    pub fn remaining_cost_after(&self, index: usize) -> f32 {
        self.strategy_sequence
            .iter()
            .skip(index + 1)
            .map(|step| step.cost.total)
            .sum()
    }
}
