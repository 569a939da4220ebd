//! HTTP embedding backend (OpenAI-style `/embeddings` endpoint).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::EmbeddingError;
use super::{validate_embedding_dim, Embedder};

/// Configuration for [`HttpEmbedder`].
#[derive(Debug, Clone)]
pub struct HttpEmbedderConfig {
    /// Full endpoint URL, e.g. `https://api.example.com/v1/embeddings`.
    pub endpoint: String,

    /// Model name sent with each request and used in cache keys.
    pub model: String,

    /// Bearer token, if the endpoint requires one.
    pub api_key: Option<String>,

    /// Expected output dimension; responses are validated against it.
    pub dimensions: usize,
}

impl HttpEmbedderConfig {
    /// Validates structural invariants before a client is built.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.endpoint.is_empty() {
            return Err(EmbeddingError::BackendFailed {
                reason: "endpoint URL must not be empty".to_owned(),
            });
        }
        if self.model.is_empty() {
            return Err(EmbeddingError::BackendFailed {
                reason: "model name must not be empty".to_owned(),
            });
        }
        if self.dimensions == 0 {
            return Err(EmbeddingError::BackendFailed {
                reason: "dimensions must be non-zero".to_owned(),
            });
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    index: usize,
    embedding: Vec<f32>,
}

/// [`Embedder`] backed by a remote embeddings API.
pub struct HttpEmbedder {
    client: reqwest::Client,
    config: HttpEmbedderConfig,
}

impl std::fmt::Debug for HttpEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEmbedder")
            .field("endpoint", &self.config.endpoint)
            .field("model", &self.config.model)
            .field("dimensions", &self.config.dimensions)
            .finish()
    }
}

impl HttpEmbedder {
    /// Builds a client from `config`.
    pub fn new(config: HttpEmbedderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;
        Ok(Self {
            client: reqwest::Client::new(),
            config,
        })
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        debug!(
            endpoint = %self.config.endpoint,
            model = %self.config.model,
            count = texts.len(),
            "Requesting embeddings"
        );

        let mut request = self.client.post(&self.config.endpoint).json(&EmbeddingsRequest {
            model: &self.config.model,
            input: texts,
        });

        if let Some(ref key) = self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Embedding endpoint returned an error");
            return Err(EmbeddingError::BackendFailed {
                reason: format!("endpoint returned {status}: {body}"),
            });
        }

        let parsed: EmbeddingsResponse = response.json().await?;

        if parsed.data.len() != texts.len() {
            return Err(EmbeddingError::InvalidResponse {
                reason: format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    parsed.data.len()
                ),
            });
        }

        // The API may reorder; restore input order by the declared index.
        let mut vectors: Vec<Option<Vec<f32>>> = vec![None; texts.len()];
        for datum in parsed.data {
            validate_embedding_dim(datum.embedding.len(), self.config.dimensions)?;
            let slot =
                vectors
                    .get_mut(datum.index)
                    .ok_or_else(|| EmbeddingError::InvalidResponse {
                        reason: format!("embedding index {} out of range", datum.index),
                    })?;
            *slot = Some(datum.embedding);
        }

        vectors
            .into_iter()
            .enumerate()
            .map(|(i, slot)| {
                slot.ok_or_else(|| EmbeddingError::InvalidResponse {
                    reason: format!("missing embedding for input {i}"),
                })
            })
            .collect()
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }
}
