use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {variable}: {value:?} ({reason})")]
    InvalidValue {
        variable: &'static str,
        value: String,
        reason: String,
    },

    #[error("default threshold {value} is outside [0, 1]")]
    ThresholdOutOfRange { value: f32 },

    #[error("max embedding batch size must be non-zero")]
    ZeroEmbedBatch,

    #[error("embedding endpoint is set but the model name is missing")]
    IncompleteEmbeddingConfig,
}
