use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("no embedder registered for provider {provider:?}")]
    ProviderNotFound { provider: String },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("no texts provided for embedding")]
    EmptyInput,

    #[error("embedding backend failure: {reason}")]
    BackendFailed { reason: String },

    #[error("embedding request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("malformed embedding response: {reason}")]
    InvalidResponse { reason: String },
}
