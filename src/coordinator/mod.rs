//! Top-level comparison orchestration.
//!
//! One coordinated comparison is a single pass: fast-path check, plan,
//! sequential strategy execution with condition gates and early exit,
//! weighted aggregation, decision, then threshold-adaptation feedback. The
//! strategy sequence is never reordered; early-exit semantics depend on
//! strict ordering.

mod stats;
mod types;


pub use stats::{CoordinatorStats, StatsTracker};
pub use types::{
    ExecutionDetails, SimilarityReport, StrategyExecutionResult, EXIT_HIGH_SIMILARITY,
    EXIT_IDENTICAL_CONTENT, EXIT_LOW_SIMILARITY, EXIT_MEDIUM_SIMILARITY,
};

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::analysis::ContentAnalyzer;
use crate::constants::{LOW_EXIT_REMAINING_COST, MEDIUM_EXIT_REMAINING_COST};
use crate::metrics::MetricsSink;
use crate::options::SimilarityOptions;
use crate::planning::{ExecutionPlan, PlanError, PlanGenerator};
use crate::strategies::{StrategyKind, StrategyRegistry};
use crate::thresholds::ThresholdManager;

#[derive(Debug, Error)]
pub enum CoordinationError {
    #[error("content {position} is empty")]
    EmptyContent { position: &'static str },

    #[error("threshold {value} is outside [0, 1]")]
    InvalidThreshold { value: f32 },

    #[error(transparent)]
    Plan(#[from] PlanError),
}

/// Orchestrates strategy execution for one content pair at a time.
pub struct SimilarityCoordinator {
    analyzer: Arc<ContentAnalyzer>,
    planner: Arc<PlanGenerator>,
    registry: Arc<StrategyRegistry>,
    thresholds: Arc<ThresholdManager>,
    metrics: Arc<dyn MetricsSink>,
    stats: StatsTracker,
}

impl std::fmt::Debug for SimilarityCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityCoordinator")
            .field("registry", &self.registry)
            .finish()
    }
}

impl SimilarityCoordinator {
    pub fn new(
        analyzer: Arc<ContentAnalyzer>,
        planner: Arc<PlanGenerator>,
        registry: Arc<StrategyRegistry>,
        thresholds: Arc<ThresholdManager>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            analyzer,
            planner,
            registry,
            thresholds,
            metrics,
            stats: StatsTracker::new(),
        }
    }

    /// Scores one content pair and decides whether it is a duplicate.
    ///
    /// Partial strategy failures degrade the score rather than failing the
    /// request; only structurally invalid input errors out.
    pub async fn calculate(
        &self,
        content1: &str,
        content2: &str,
        options: &SimilarityOptions,
    ) -> Result<SimilarityReport, CoordinationError> {
        validate_input(content1, content2, options)?;

        let started = Instant::now();

        // Byte-equal inputs need no plan at all.
        if content1 == content2 {
            let report = self.identical_content_report(options);
            self.finish(started, &report);
            return Ok(report);
        }

        let analysis = self.analyzer.analyze(content1, content2, options).await;
        let content_type = analysis.content_type;
        let plan = self.planner.generate(&analysis, options)?;

        // Strategies see the detected content type: keyword filtering and
        // support checks depend on it.
        let mut exec_options = options.clone();
        exec_options.content_type.get_or_insert(content_type);

        let (results, details) = self
            .execute_plan(&plan, content1, content2, &exec_options)
            .await;

        let similarity = aggregate(&results);
        let threshold = options
            .threshold
            .unwrap_or_else(|| self.thresholds.strategy_threshold(StrategyKind::Hybrid, content_type));

        let report = SimilarityReport {
            similarity,
            is_similar: similarity >= threshold,
            threshold,
            execution_plan: Some(plan),
            execution: ExecutionDetails {
                total_execution_time_ms: started.elapsed().as_secs_f64() * 1000.0,
                ..details
            },
            strategy_results: results,
        };

        // Feedback keyed by the first executed strategy; its own problems
        // must never surface to the caller.
        let feedback_kind = report
            .strategy_results
            .first()
            .map_or(StrategyKind::Hybrid, |result| result.strategy);
        let outcomes: Vec<_> = report
            .strategy_results
            .iter()
            .map(StrategyExecutionResult::outcome)
            .collect();
        self.thresholds.adapt(feedback_kind, content_type, &outcomes);

        self.finish(started, &report);

        info!(
            similarity = report.similarity,
            is_similar = report.is_similar,
            executed = report.execution.executed_strategies,
            early_exit = report.execution.early_exit,
            "Comparison complete"
        );

        Ok(report)
    }

    /// Current rolling statistics.
    pub fn stats(&self) -> CoordinatorStats {
        self.stats.snapshot()
    }

    fn identical_content_report(&self, options: &SimilarityOptions) -> SimilarityReport {
        let threshold = options.threshold.unwrap_or_else(|| {
            let content_type = options
                .content_type
                .unwrap_or(crate::analysis::ContentType::Generic);
            self.thresholds
                .strategy_threshold(StrategyKind::Hybrid, content_type)
        });

        debug!("Identical content fast path");

        SimilarityReport {
            similarity: 1.0,
            is_similar: true,
            threshold,
            execution_plan: None,
            execution: ExecutionDetails {
                total_execution_time_ms: 0.0,
                executed_strategies: 0,
                early_exit: true,
                exit_reason: Some(EXIT_IDENTICAL_CONTENT.to_owned()),
                cache_hits: 0,
                errors: Vec::new(),
            },
            strategy_results: Vec::new(),
        }
    }

    async fn execute_plan(
        &self,
        plan: &ExecutionPlan,
        content1: &str,
        content2: &str,
        options: &SimilarityOptions,
    ) -> (Vec<StrategyExecutionResult>, ExecutionDetails) {
        let mut results: Vec<StrategyExecutionResult> = Vec::new();
        let mut details = ExecutionDetails::default();
        let mut previous_similarity: Option<f32> = None;

        let last_index = plan.strategy_sequence.len().saturating_sub(1);

        for step in &plan.strategy_sequence {
            let Some(strategy) = self.registry.get(step.strategy) else {
                error!(strategy = %step.strategy, "Planned strategy is not registered, skipping");
                details
                    .errors
                    .push(format!("strategy {} not registered", step.strategy));
                continue;
            };

            if let Some(condition) = step.condition {
                if !step.required && !condition.is_met(previous_similarity) {
                    debug!(
                        strategy = %step.strategy,
                        previous = ?previous_similarity,
                        "Step condition unmet, skipping"
                    );
                    continue;
                }
            }

            let step_started = Instant::now();
            let outcome = strategy.calculate(content1, content2, options).await;
            let execution_time_ms = step_started.elapsed().as_secs_f64() * 1000.0;

            details.executed_strategies += 1;

            let result = match outcome {
                Ok(score) => {
                    if score.cache_hit {
                        details.cache_hits += 1;
                    }
                    StrategyExecutionResult {
                        strategy: step.strategy,
                        similarity: score.similarity,
                        execution_time_ms,
                        success: true,
                        error: None,
                        cache_hit: score.cache_hit,
                        weight: step.weight,
                    }
                }
                Err(err) => {
                    warn!(strategy = %step.strategy, error = %err, "Strategy failed, continuing");
                    details.errors.push(format!("{}: {err}", step.strategy));
                    StrategyExecutionResult {
                        strategy: step.strategy,
                        similarity: 0.0,
                        execution_time_ms,
                        success: false,
                        error: Some(err.to_string()),
                        cache_hit: false,
                        weight: step.weight,
                    }
                }
            };

            let succeeded = result.success;
            if succeeded {
                previous_similarity = Some(result.similarity);
            }
            results.push(result);

            if succeeded {
                if let Some(reason) = early_exit_reason(plan, step.order, last_index, previous_similarity)
                {
                    debug!(reason, after = step.order + 1, "Early exit");
                    details.early_exit = true;
                    details.exit_reason = Some(reason.to_owned());
                    break;
                }
            }
        }

        (results, details)
    }

    fn finish(&self, started: Instant, report: &SimilarityReport) {
        let duration = started.elapsed();
        let executed: Vec<(StrategyKind, bool)> = report
            .strategy_results
            .iter()
            .map(|result| (result.strategy, result.cache_hit))
            .collect();

        self.stats.record(
            duration.as_secs_f64() * 1000.0,
            report.execution.early_exit,
            !report.execution.errors.is_empty(),
            &executed,
        );

        self.metrics
            .record_operation("calculate_similarity", duration, true);
        self.metrics.incr_counter("comparisons_total", 1);
        if report.execution.early_exit {
            self.metrics.incr_counter("early_exits_total", 1);
        }
    }
}

fn validate_input(
    content1: &str,
    content2: &str,
    options: &SimilarityOptions,
) -> Result<(), CoordinationError> {
    if content1.is_empty() {
        return Err(CoordinationError::EmptyContent { position: "first" });
    }
    if content2.is_empty() {
        return Err(CoordinationError::EmptyContent { position: "second" });
    }
    if let Some(threshold) = options.threshold {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(CoordinationError::InvalidThreshold { value: threshold });
        }
    }
    Ok(())
}

/// Early-exit rules, evaluated after each successful step.
///
/// The final step never exits early: there is nothing left to skip.
fn early_exit_reason(
    plan: &ExecutionPlan,
    order: usize,
    last_index: usize,
    similarity: Option<f32>,
) -> Option<&'static str> {
    let similarity = similarity?;
    let thresholds = plan.early_exit_thresholds;

    if similarity >= thresholds.high {
        return Some(EXIT_HIGH_SIMILARITY);
    }

    if order == last_index {
        return None;
    }

    let remaining = plan.remaining_cost_after(order);

    if similarity >= thresholds.medium && remaining > MEDIUM_EXIT_REMAINING_COST {
        return Some(EXIT_MEDIUM_SIMILARITY);
    }

    if similarity >= thresholds.low && remaining > LOW_EXIT_REMAINING_COST {
        return Some(EXIT_LOW_SIMILARITY);
    }

    None
}

/// Weighted average of successful results; zero results score 0.
fn aggregate(results: &[StrategyExecutionResult]) -> f32 {
    let mut weighted_sum = 0.0f32;
    let mut weight_sum = 0.0f32;

    for result in results.iter().filter(|result| result.success) {
        let weight = if result.weight > 0.0 { result.weight } else { 1.0 };
        weighted_sum += weight * result.similarity;
        weight_sum += weight;
    }

    if weight_sum <= 0.0 {
        return 0.0;
    }

    (weighted_sum / weight_sum).clamp(0.0, 1.0)
}
