//! Adaptive decision thresholds.
//!
//! The manager owns two maps: per-content-type early-exit thresholds and
//! per-(content-type, strategy) decision thresholds, both falling back to
//! fixed defaults. Observed execution outcomes accumulate in a bounded
//! history that nudges thresholds over time; adaptation runs synchronously
//! after every coordinated comparison and never fails the caller.

mod types;


pub use types::{EarlyExitThresholds, ExecutionOutcome};

use std::collections::{HashMap, VecDeque};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::analysis::ContentType;
use crate::constants::{
    ADAPTIVE_HISTORY_CAP, ADAPTIVE_HYSTERESIS, ADAPTIVE_MIN_SAMPLES, ADAPTIVE_SLOW_EXECUTION_MS,
    ADAPTIVE_THRESHOLD_CEIL, ADAPTIVE_THRESHOLD_FLOOR, ADAPTIVE_WINDOW,
    DEFAULT_DECISION_THRESHOLD,
};
use crate::strategies::StrategyKind;

type Key = (ContentType, StrategyKind);

/// Holds and tunes the engine's decision thresholds.
pub struct ThresholdManager {
    early_exit: RwLock<HashMap<ContentType, EarlyExitThresholds>>,
    strategy: RwLock<HashMap<Key, f32>>,
    history: Mutex<HashMap<Key, VecDeque<ExecutionOutcome>>>,
}

impl std::fmt::Debug for ThresholdManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThresholdManager")
            .field("early_exit_overrides", &self.early_exit.read().len())
            .field("strategy_overrides", &self.strategy.read().len())
            .finish()
    }
}

impl ThresholdManager {
    pub fn new() -> Self {
        Self {
            early_exit: RwLock::new(HashMap::new()),
            strategy: RwLock::new(HashMap::new()),
            history: Mutex::new(HashMap::new()),
        }
    }

    /// Early-exit thresholds for `content_type`, defaulting when unset.
    pub fn early_exit_thresholds(&self, content_type: ContentType) -> EarlyExitThresholds {
        self.early_exit
            .read()
            .get(&content_type)
            .copied()
            .unwrap_or_default()
    }

    /// Installs early-exit thresholds for `content_type`.
    pub fn set_early_exit_thresholds(
        &self,
        content_type: ContentType,
        thresholds: EarlyExitThresholds,
    ) {
        if !thresholds.is_ordered() {
            warn!(
                %content_type,
                high = thresholds.high,
                medium = thresholds.medium,
                low = thresholds.low,
                "Early-exit thresholds are not monotonically ordered (configuration bug)"
            );
        }
        self.early_exit.write().insert(content_type, thresholds);
    }

    /// Decision threshold for `(strategy, content_type)`, defaulting when
    /// unset.
    pub fn strategy_threshold(&self, strategy: StrategyKind, content_type: ContentType) -> f32 {
        self.strategy
            .read()
            .get(&(content_type, strategy))
            .copied()
            .unwrap_or_else(|| Self::default_strategy_threshold(strategy))
    }

    /// Installs a decision threshold for `(strategy, content_type)`.
    pub fn set_strategy_threshold(
        &self,
        strategy: StrategyKind,
        content_type: ContentType,
        threshold: f32,
    ) {
        self.strategy
            .write()
            .insert((content_type, strategy), threshold);
    }

    /// Fixed fallback thresholds per strategy kind.
    pub fn default_strategy_threshold(strategy: StrategyKind) -> f32 {
        match strategy {
            StrategyKind::Keyword => 0.8,
            StrategyKind::Levenshtein => 0.75,
            StrategyKind::Semantic => 0.7,
            StrategyKind::Hybrid => 0.75,
            StrategyKind::Structure => DEFAULT_DECISION_THRESHOLD,
        }
    }

    /// Feeds execution outcomes into the adaptation history and retunes the
    /// threshold when enough evidence accumulated.
    ///
    /// Runs synchronously after each comparison; it must never block long or
    /// fail, so all work is in-memory and bounded.
    pub fn adapt(
        &self,
        strategy: StrategyKind,
        content_type: ContentType,
        outcomes: &[ExecutionOutcome],
    ) {
        if outcomes.is_empty() {
            return;
        }

        let key = (content_type, strategy);
        let window: Vec<ExecutionOutcome> = {
            let mut history = self.history.lock();
            let entries = history.entry(key).or_default();
            for outcome in outcomes {
                if entries.len() >= ADAPTIVE_HISTORY_CAP {
                    entries.pop_front();
                }
                entries.push_back(*outcome);
            }

            if entries.len() < ADAPTIVE_MIN_SAMPLES {
                return;
            }

            entries
                .iter()
                .rev()
                .take(ADAPTIVE_WINDOW)
                .copied()
                .collect()
        };

        let count = window.len() as f64;
        let success_rate =
            window.iter().filter(|outcome| outcome.success).count() as f64 / count;
        let avg_similarity =
            window.iter().map(|outcome| outcome.similarity as f64).sum::<f64>() / count;
        let avg_execution_time =
            window.iter().map(|outcome| outcome.execution_time_ms).sum::<f64>() / count;

        let current = self.strategy_threshold(strategy, content_type);
        let mut adjusted = current;

        // Ordered multiplicative adjustments; conditions see the evolving
        // value.
        if success_rate < 0.8 {
            adjusted *= 0.95;
        }
        if success_rate > 0.95 {
            adjusted *= 1.02;
        }
        if avg_similarity < 0.3 && adjusted > 0.6 {
            adjusted *= 0.9;
        }
        if avg_similarity > 0.8 && adjusted < 0.8 {
            adjusted *= 1.1;
        }
        if avg_execution_time > ADAPTIVE_SLOW_EXECUTION_MS {
            adjusted *= 0.98;
        }

        let adjusted = adjusted.clamp(ADAPTIVE_THRESHOLD_FLOOR, ADAPTIVE_THRESHOLD_CEIL);

        if (adjusted - current).abs() > ADAPTIVE_HYSTERESIS {
            debug!(
                %strategy,
                %content_type,
                from = current,
                to = adjusted,
                success_rate,
                avg_similarity,
                "Adapted strategy threshold"
            );
            self.set_strategy_threshold(strategy, content_type, adjusted);
        }
    }

    #[cfg(test)]
    fn history_len(&self, strategy: StrategyKind, content_type: ContentType) -> usize {
        self.history
            .lock()
            .get(&(content_type, strategy))
            .map_or(0, VecDeque::len)
    }
}

impl Default for ThresholdManager {
    fn default() -> Self {
        Self::new()
    }
}
