use serde_json::{json, Value};
use thiserror::Error;

use crate::batch::BatchError;
use crate::coordinator::CoordinationError;
use crate::embedding::EmbeddingError;
use crate::planning::PlanError;
use crate::strategies::StrategyKind;

/// Caller-facing engine error.
///
/// Every variant maps to a stable string code via [`code`](EngineError::code)
/// and carries a structured payload via [`details`](EngineError::details), so
/// hosts can branch on codes without parsing messages.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("insufficient input: batch requires at least 2 contents, got {count}")]
    InsufficientInput { count: usize },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("invalid threshold: {value} is outside [0, 1]")]
    InvalidThreshold { value: f32 },

    #[error("strategy not supported: {reason}")]
    StrategyNotSupported {
        reason: String,
        kind: Option<StrategyKind>,
    },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("missing factory: {reason}")]
    MissingFactory { reason: String },

    #[error("hybrid strategy exposes no sub-strategies")]
    InvalidHybridStrategy,

    #[error("execution failed: {reason}")]
    ExecutionFailed { reason: String },
}

impl EngineError {
    /// Stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InsufficientInput { .. } => "INSUFFICIENT_INPUT",
            EngineError::InvalidInput { .. } => "INVALID_INPUT",
            EngineError::InvalidThreshold { .. } => "INVALID_THRESHOLD",
            EngineError::StrategyNotSupported { .. } => "STRATEGY_NOT_SUPPORTED",
            EngineError::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            EngineError::MissingFactory { .. } => "MISSING_FACTORY",
            EngineError::InvalidHybridStrategy => "INVALID_HYBRID_STRATEGY",
            EngineError::ExecutionFailed { .. } => "EXECUTION_FAILED",
        }
    }

    /// Structured details payload.
    pub fn details(&self) -> Value {
        match self {
            EngineError::InsufficientInput { count } => json!({ "count": count }),
            EngineError::InvalidInput { reason } => json!({ "reason": reason }),
            EngineError::InvalidThreshold { value } => json!({ "value": value }),
            EngineError::StrategyNotSupported { reason, kind } => json!({
                "reason": reason,
                "strategy": kind.map(|kind| kind.as_str()),
            }),
            EngineError::DimensionMismatch { expected, actual } => json!({
                "expected": expected,
                "actual": actual,
            }),
            EngineError::MissingFactory { reason } => json!({ "reason": reason }),
            EngineError::InvalidHybridStrategy => json!({}),
            EngineError::ExecutionFailed { reason } => json!({ "reason": reason }),
        }
    }
}

impl From<CoordinationError> for EngineError {
    fn from(error: CoordinationError) -> Self {
        match error {
            CoordinationError::EmptyContent { position } => EngineError::InvalidInput {
                reason: format!("{position} content is empty"),
            },
            CoordinationError::InvalidThreshold { value } => {
                EngineError::InvalidThreshold { value }
            }
            CoordinationError::Plan(plan) => plan.into(),
        }
    }
}

impl From<PlanError> for EngineError {
    fn from(error: PlanError) -> Self {
        match error {
            PlanError::StrategyNotSupported { kind } => EngineError::StrategyNotSupported {
                reason: format!("strategy {kind} has no registered implementation"),
                kind: Some(kind),
            },
            PlanError::EmptySequence => EngineError::StrategyNotSupported {
                reason: "no executable strategies for this request".to_owned(),
                kind: None,
            },
        }
    }
}

impl From<BatchError> for EngineError {
    fn from(error: BatchError) -> Self {
        match error {
            BatchError::InsufficientInput { count } => EngineError::InsufficientInput { count },
            BatchError::InvalidInput { index } => EngineError::InvalidInput {
                reason: format!("content at index {index} is empty"),
            },
            BatchError::InvalidThreshold { value } => EngineError::InvalidThreshold { value },
            BatchError::StrategyNotSupported { kind, calculator } => {
                EngineError::StrategyNotSupported {
                    reason: format!("{kind} is not executable by the {calculator} calculator"),
                    kind: Some(kind),
                }
            }
            BatchError::InvalidHybridStrategy => EngineError::InvalidHybridStrategy,
            BatchError::MissingFactory { reason } => EngineError::MissingFactory { reason },
            BatchError::Embedding(EmbeddingError::DimensionMismatch { expected, actual }) => {
                EngineError::DimensionMismatch { expected, actual }
            }
            BatchError::Embedding(EmbeddingError::ProviderNotFound { provider }) => {
                EngineError::MissingFactory {
                    reason: format!("no embedder registered for provider {provider:?}"),
                }
            }
            BatchError::Embedding(inner) => EngineError::ExecutionFailed {
                reason: inner.to_string(),
            },
            BatchError::Strategy(inner) => EngineError::ExecutionFailed {
                reason: inner.to_string(),
            },
        }
    }
}
