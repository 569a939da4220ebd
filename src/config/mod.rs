//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `KINDRED_*` environment
//! variables.

pub mod error;


pub use error::ConfigError;

use std::env;

use crate::constants::{
    ANALYSIS_CACHE_TTL_SECS, DEFAULT_DECISION_THRESHOLD, DEFAULT_EMBEDDING_DIM,
    DEFAULT_MAX_EMBED_BATCH, EMBEDDING_CACHE_TTL_SECS,
};

/// Engine configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `KINDRED_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Decision threshold when neither request nor threshold manager sets
    /// one. Default: `0.75`.
    pub default_threshold: f32,

    /// Max entries in the in-memory cache. Default: `50_000`.
    pub cache_capacity: u64,

    /// Max texts per bulk embedding request. Default: `50`.
    pub max_embed_batch: usize,

    /// TTL for cached content analyses, in seconds. Default: `3600`.
    pub analysis_cache_ttl_secs: u64,

    /// TTL for cached embedding vectors, in seconds. Default: `86_400`.
    pub embedding_cache_ttl_secs: u64,

    /// Remote embedding endpoint URL. Unset disables the HTTP embedder.
    pub embedding_endpoint: Option<String>,

    /// Model name sent to the remote embedding endpoint.
    pub embedding_model: Option<String>,

    /// Bearer token for the remote embedding endpoint.
    pub embedding_api_key: Option<String>,

    /// Expected embedding dimension. Default: `384`.
    pub embedding_dimensions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_threshold: DEFAULT_DECISION_THRESHOLD,
            cache_capacity: 50_000,
            max_embed_batch: DEFAULT_MAX_EMBED_BATCH,
            analysis_cache_ttl_secs: ANALYSIS_CACHE_TTL_SECS,
            embedding_cache_ttl_secs: EMBEDDING_CACHE_TTL_SECS,
            embedding_endpoint: None,
            embedding_model: None,
            embedding_api_key: None,
            embedding_dimensions: DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl Config {
    const ENV_DEFAULT_THRESHOLD: &'static str = "KINDRED_DEFAULT_THRESHOLD";
    const ENV_CACHE_CAPACITY: &'static str = "KINDRED_CACHE_CAPACITY";
    const ENV_MAX_EMBED_BATCH: &'static str = "KINDRED_MAX_EMBED_BATCH";
    const ENV_ANALYSIS_CACHE_TTL: &'static str = "KINDRED_ANALYSIS_CACHE_TTL_SECS";
    const ENV_EMBEDDING_CACHE_TTL: &'static str = "KINDRED_EMBEDDING_CACHE_TTL_SECS";
    const ENV_EMBEDDING_ENDPOINT: &'static str = "KINDRED_EMBEDDING_ENDPOINT";
    const ENV_EMBEDDING_MODEL: &'static str = "KINDRED_EMBEDDING_MODEL";
    const ENV_EMBEDDING_API_KEY: &'static str = "KINDRED_EMBEDDING_API_KEY";
    const ENV_EMBEDDING_DIMENSIONS: &'static str = "KINDRED_EMBEDDING_DIMENSIONS";

    /// Loads configuration from environment variables (falling back to
    /// defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            default_threshold: Self::parse_from_env(
                Self::ENV_DEFAULT_THRESHOLD,
                defaults.default_threshold,
            )?,
            cache_capacity: Self::parse_from_env(
                Self::ENV_CACHE_CAPACITY,
                defaults.cache_capacity,
            )?,
            max_embed_batch: Self::parse_from_env(
                Self::ENV_MAX_EMBED_BATCH,
                defaults.max_embed_batch,
            )?,
            analysis_cache_ttl_secs: Self::parse_from_env(
                Self::ENV_ANALYSIS_CACHE_TTL,
                defaults.analysis_cache_ttl_secs,
            )?,
            embedding_cache_ttl_secs: Self::parse_from_env(
                Self::ENV_EMBEDDING_CACHE_TTL,
                defaults.embedding_cache_ttl_secs,
            )?,
            embedding_endpoint: Self::optional_from_env(Self::ENV_EMBEDDING_ENDPOINT),
            embedding_model: Self::optional_from_env(Self::ENV_EMBEDDING_MODEL),
            embedding_api_key: Self::optional_from_env(Self::ENV_EMBEDDING_API_KEY),
            embedding_dimensions: Self::parse_from_env(
                Self::ENV_EMBEDDING_DIMENSIONS,
                defaults.embedding_dimensions,
            )?,
        })
    }

    /// Validates value ranges and cross-field invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.default_threshold) {
            return Err(ConfigError::ThresholdOutOfRange {
                value: self.default_threshold,
            });
        }

        if self.max_embed_batch == 0 {
            return Err(ConfigError::ZeroEmbedBatch);
        }

        if self.embedding_endpoint.is_some() && self.embedding_model.is_none() {
            return Err(ConfigError::IncompleteEmbeddingConfig);
        }

        Ok(())
    }

    fn parse_from_env<T>(variable: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(variable) {
            Ok(value) => value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
                variable,
                value,
                reason: e.to_string(),
            }),
            Err(_) => Ok(default),
        }
    }

    fn optional_from_env(variable: &'static str) -> Option<String> {
        env::var(variable).ok().filter(|value| !value.is_empty())
    }
}
