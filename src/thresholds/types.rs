use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_EARLY_EXIT_HIGH, DEFAULT_EARLY_EXIT_LOW, DEFAULT_EARLY_EXIT_MEDIUM,
};

/// Early-exit thresholds for one content type.
///
/// `high >= medium >= low` is expected; a violation is a configuration bug
/// that gets logged, never silently reordered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarlyExitThresholds {
    pub high: f32,
    pub medium: f32,
    pub low: f32,
}

impl Default for EarlyExitThresholds {
    fn default() -> Self {
        Self {
            high: DEFAULT_EARLY_EXIT_HIGH,
            medium: DEFAULT_EARLY_EXIT_MEDIUM,
            low: DEFAULT_EARLY_EXIT_LOW,
        }
    }
}

impl EarlyExitThresholds {
    /// Returns `true` when the tiers are monotonically ordered.
    pub fn is_ordered(&self) -> bool {
        self.high >= self.medium && self.medium >= self.low
    }
}

/// Minimal execution record fed into threshold adaptation.
///
/// Deliberately decoupled from the coordinator's richer result type: the
/// manager only ever looks at these three fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutionOutcome {
    pub success: bool,
    pub similarity: f32,
    pub execution_time_ms: f64,
}
