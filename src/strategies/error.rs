use thiserror::Error;

use super::StrategyKind;
use crate::analysis::ContentType;
use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("strategy {kind} does not support {content_type} content")]
    Unsupported {
        kind: StrategyKind,
        content_type: ContentType,
    },

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("similarity computation failed: {reason}")]
    ComputationFailed { reason: String },
}
