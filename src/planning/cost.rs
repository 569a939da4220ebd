//! Static strategy cost table.

use serde::{Deserialize, Serialize};

use crate::strategies::StrategyKind;

/// Estimated cost of one strategy invocation.
///
/// `computational` and `memory` are normalized to `[0, 1]`; `time_ms` is a
/// wall-clock estimate; `total` is the aggregate used by early-exit math.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyCost {
    pub computational: f32,
    pub memory: f32,
    pub time_ms: f64,
    pub total: f32,
}

impl StrategyCost {
    pub const fn new(computational: f32, memory: f32, time_ms: f64, total: f32) -> Self {
        Self {
            computational,
            memory,
            time_ms,
            total,
        }
    }

    /// Static default for a strategy kind.
    ///
    /// Embedding-backed strategies dominate the table; the planner uses these
    /// to decide whether skipping the rest of a sequence is worthwhile.
    pub fn default_for(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::Keyword => Self::new(0.2, 0.1, 20.0, 0.2),
            StrategyKind::Levenshtein => Self::new(0.3, 0.2, 50.0, 0.3),
            StrategyKind::Structure => Self::new(0.4, 0.3, 100.0, 0.4),
            StrategyKind::Semantic => Self::new(0.8, 0.6, 500.0, 0.8),
            StrategyKind::Hybrid => Self::new(0.9, 0.7, 800.0, 0.9),
        }
    }
}
