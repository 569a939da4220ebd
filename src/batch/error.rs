use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::strategies::{StrategyError, StrategyKind};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("batch requires at least 2 contents, got {count}")]
    InsufficientInput { count: usize },

    #[error("content at index {index} is empty")]
    InvalidInput { index: usize },

    #[error("threshold {value} is outside [0, 1]")]
    InvalidThreshold { value: f32 },

    #[error("strategy {kind} is not executable by the {calculator} batch calculator")]
    StrategyNotSupported {
        kind: StrategyKind,
        calculator: &'static str,
    },

    #[error("hybrid batch requires a strategy exposing sub-strategies")]
    InvalidHybridStrategy,

    #[error("no batch calculator available: {reason}")]
    MissingFactory { reason: String },

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Strategy(#[from] StrategyError),
}

impl BatchError {
    /// Stable error code surfaced to callers.
    pub fn code(&self) -> &'static str {
        match self {
            BatchError::InsufficientInput { .. } => "INSUFFICIENT_INPUT",
            BatchError::InvalidInput { .. } => "INVALID_INPUT",
            BatchError::InvalidThreshold { .. } => "INVALID_THRESHOLD",
            BatchError::StrategyNotSupported { .. } => "STRATEGY_NOT_SUPPORTED",
            BatchError::InvalidHybridStrategy => "INVALID_HYBRID_STRATEGY",
            BatchError::MissingFactory { .. } => "MISSING_FACTORY",
            BatchError::Embedding(EmbeddingError::DimensionMismatch { .. }) => "DIMENSION_MISMATCH",
            BatchError::Embedding(EmbeddingError::ProviderNotFound { .. }) => "MISSING_FACTORY",
            BatchError::Embedding(_) => "EMBEDDING_FAILED",
            BatchError::Strategy(_) => "STRATEGY_FAILED",
        }
    }
}
