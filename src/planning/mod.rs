//! Execution-plan generation.
//!
//! Turns a content analysis into an ordered, cost-annotated strategy
//! sequence plus the early-exit thresholds the coordinator enforces.
//! Strategy kinds without a registered implementation are rejected here, not
//! at invocation time.

mod cost;
mod types;

#[cfg(test)]
mod tests;

pub use cost::StrategyCost;
pub use types::{ExecutionPlan, StepCondition, StrategyExecutionStep};

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::analysis::ContentAnalysisResult;
use crate::constants::{LONG_CONTENT_LEN, SHORT_CONTENT_LEN};
use crate::options::SimilarityOptions;
use crate::strategies::{StrategyKind, StrategyRegistry};
use crate::thresholds::ThresholdManager;

/// Gate bounds attached to non-solo semantic steps: skip the embedding call
/// when the previous strategy already settled the question either way.
const SEMANTIC_GATE_MIN: f32 = 0.2;
const SEMANTIC_GATE_MAX: f32 = 0.95;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("strategy {kind} has no registered implementation")]
    StrategyNotSupported { kind: StrategyKind },

    #[error("no executable strategies for this request")]
    EmptySequence,
}

/// Builds execution plans from content analyses.
pub struct PlanGenerator {
    thresholds: Arc<ThresholdManager>,
    registry: Arc<StrategyRegistry>,
    costs: RwLock<HashMap<StrategyKind, StrategyCost>>,
}

impl std::fmt::Debug for PlanGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanGenerator")
            .field("registry", &self.registry)
            .finish()
    }
}

impl PlanGenerator {
    pub fn new(thresholds: Arc<ThresholdManager>, registry: Arc<StrategyRegistry>) -> Self {
        let costs = StrategyKind::ALL
            .iter()
            .map(|kind| (*kind, StrategyCost::default_for(*kind)))
            .collect();

        Self {
            thresholds,
            registry,
            costs: RwLock::new(costs),
        }
    }

    /// Generates a plan for one comparison.
    pub fn generate(
        &self,
        analysis: &ContentAnalysisResult,
        options: &SimilarityOptions,
    ) -> Result<ExecutionPlan, PlanError> {
        let kinds = self.resolve_sequence(analysis, options)?;

        let content_type = analysis.content_type;
        let steps: Vec<StrategyExecutionStep> = kinds
            .iter()
            .enumerate()
            .map(|(order, &kind)| {
                let condition = (kind == StrategyKind::Semantic && kinds.len() > 1).then_some(
                    StepCondition {
                        min_previous: Some(SEMANTIC_GATE_MIN),
                        max_previous: Some(SEMANTIC_GATE_MAX),
                    },
                );

                StrategyExecutionStep {
                    strategy: kind,
                    order,
                    cost: self.cost_for(kind),
                    required: order == 0,
                    condition,
                    weight: self.thresholds.strategy_threshold(kind, content_type),
                }
            })
            .collect();

        let base_time: f64 = steps.iter().map(|step| step.cost.time_ms).sum();
        let has_hybrid = steps
            .iter()
            .any(|step| step.strategy == StrategyKind::Hybrid);
        let estimated_execution_time_ms =
            base_time * length_multiplier(analysis.content_length, has_hybrid);

        let plan = ExecutionPlan {
            id: Uuid::new_v4(),
            content_analysis: analysis.clone(),
            strategy_sequence: steps,
            early_exit_thresholds: self.thresholds.early_exit_thresholds(content_type),
            estimated_execution_time_ms,
            created_at: Utc::now(),
        };

        debug!(
            plan_id = %plan.id,
            steps = plan.strategy_sequence.len(),
            estimated_ms = plan.estimated_execution_time_ms,
            "Generated execution plan"
        );

        Ok(plan)
    }

    fn resolve_sequence(
        &self,
        analysis: &ContentAnalysisResult,
        options: &SimilarityOptions,
    ) -> Result<Vec<StrategyKind>, PlanError> {
        if let Some(kind) = options.strategy {
            if !self.registry.contains(kind) {
                return Err(PlanError::StrategyNotSupported { kind });
            }
            return Ok(vec![kind]);
        }

        let kinds: Vec<StrategyKind> = analysis
            .recommended_strategies
            .iter()
            .copied()
            .filter(|&kind| {
                let registered = self.registry.contains(kind);
                if !registered {
                    warn!(strategy = %kind, "Dropping unregistered strategy from plan");
                }
                registered
            })
            .collect();

        if kinds.is_empty() {
            return Err(PlanError::EmptySequence);
        }

        Ok(kinds)
    }

    /// Current cost table entry for `kind`.
    pub fn cost_for(&self, kind: StrategyKind) -> StrategyCost {
        self.costs
            .read()
            .get(&kind)
            .copied()
            .unwrap_or_else(|| StrategyCost::default_for(kind))
    }

    /// Snapshot of the full cost table.
    pub fn strategy_costs(&self) -> HashMap<StrategyKind, StrategyCost> {
        self.costs.read().clone()
    }

    /// Recalibrates the cost entry for `kind`.
    pub fn update_strategy_cost(&self, kind: StrategyKind, cost: StrategyCost) {
        self.costs.write().insert(kind, cost);
    }
}

/// Time-estimate multiplier from average content length.
fn length_multiplier(avg_length: usize, has_hybrid: bool) -> f64 {
    if avg_length < SHORT_CONTENT_LEN {
        0.5
    } else if avg_length > LONG_CONTENT_LEN {
        if has_hybrid { 2.5 } else { 2.0 }
    } else {
        1.0
    }
}
