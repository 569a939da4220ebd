//! Rolling coordinator statistics.
//!
//! All aggregates update incrementally; nothing replays history.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::strategies::StrategyKind;

/// Snapshot of the coordinator's rolling statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorStats {
    pub total_calculations: u64,
    pub avg_execution_time_ms: f64,
    pub early_exit_rate: f64,
    /// Fraction of strategy invocations served from cached state.
    pub cache_hit_rate: f64,
    pub strategy_usage: HashMap<StrategyKind, u64>,
    /// Fraction of comparisons that recorded at least one strategy error.
    pub error_rate: f64,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug)]
struct StatsInner {
    total_calculations: u64,
    avg_execution_time_ms: f64,
    early_exit_rate: f64,
    strategy_invocations: u64,
    strategy_cache_hits: u64,
    strategy_usage: HashMap<StrategyKind, u64>,
    error_rate: f64,
    last_updated: DateTime<Utc>,
}

/// Mutex-guarded accumulator behind [`CoordinatorStats`].
#[derive(Debug)]
pub struct StatsTracker {
    inner: Mutex<StatsInner>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StatsInner {
                total_calculations: 0,
                avg_execution_time_ms: 0.0,
                early_exit_rate: 0.0,
                strategy_invocations: 0,
                strategy_cache_hits: 0,
                strategy_usage: HashMap::new(),
                error_rate: 0.0,
                last_updated: Utc::now(),
            }),
        }
    }

    /// Folds one completed comparison into the aggregates.
    pub fn record(
        &self,
        execution_time_ms: f64,
        early_exit: bool,
        had_errors: bool,
        executed: &[(StrategyKind, bool)],
    ) {
        let mut inner = self.inner.lock();

        inner.total_calculations += 1;
        let n = inner.total_calculations as f64;

        // Incremental running averages: avg += (x - avg) / n.
        inner.avg_execution_time_ms += (execution_time_ms - inner.avg_execution_time_ms) / n;
        inner.early_exit_rate +=
            ((if early_exit { 1.0 } else { 0.0 }) - inner.early_exit_rate) / n;
        inner.error_rate += ((if had_errors { 1.0 } else { 0.0 }) - inner.error_rate) / n;

        for (kind, cache_hit) in executed {
            inner.strategy_invocations += 1;
            if *cache_hit {
                inner.strategy_cache_hits += 1;
            }
            *inner.strategy_usage.entry(*kind).or_insert(0) += 1;
        }

        inner.last_updated = Utc::now();
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> CoordinatorStats {
        let inner = self.inner.lock();

        let cache_hit_rate = if inner.strategy_invocations == 0 {
            0.0
        } else {
            inner.strategy_cache_hits as f64 / inner.strategy_invocations as f64
        };

        CoordinatorStats {
            total_calculations: inner.total_calculations,
            avg_execution_time_ms: inner.avg_execution_time_ms,
            early_exit_rate: inner.early_exit_rate,
            cache_hit_rate,
            strategy_usage: inner.strategy_usage.clone(),
            error_rate: inner.error_rate,
            last_updated: inner.last_updated,
        }
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}
