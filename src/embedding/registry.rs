//! Provider-name to embedder resolution.

use std::collections::HashMap;
use std::sync::Arc;

use super::error::EmbeddingError;
use super::Embedder;

/// Maps provider names to [`Embedder`] instances.
///
/// Resolution order: an explicit provider name, else the configured default
/// provider, else the sole registered embedder. Registries are assembled once
/// at startup and shared immutably afterwards.
#[derive(Default)]
pub struct EmbedderRegistry {
    providers: HashMap<String, Arc<dyn Embedder>>,
    default_provider: Option<String>,
}

impl std::fmt::Debug for EmbedderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbedderRegistry")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .field("default_provider", &self.default_provider)
            .finish()
    }
}

impl EmbedderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `embedder` under `name`. The first registration becomes the
    /// default provider.
    pub fn register(&mut self, name: impl Into<String>, embedder: Arc<dyn Embedder>) {
        let name = name.into();
        if self.default_provider.is_none() {
            self.default_provider = Some(name.clone());
        }
        self.providers.insert(name, embedder);
    }

    /// Overrides the default provider. Returns `false` if `name` is unknown.
    pub fn set_default(&mut self, name: &str) -> bool {
        if self.providers.contains_key(name) {
            self.default_provider = Some(name.to_owned());
            true
        } else {
            false
        }
    }

    /// Resolves an embedder by provider name (or the default).
    pub fn get(&self, provider: Option<&str>) -> Result<Arc<dyn Embedder>, EmbeddingError> {
        let name = provider
            .map(str::to_owned)
            .or_else(|| self.default_provider.clone())
            .ok_or_else(|| EmbeddingError::ProviderNotFound {
                provider: "<default>".to_owned(),
            })?;

        self.providers
            .get(&name)
            .cloned()
            .ok_or(EmbeddingError::ProviderNotFound { provider: name })
    }

    /// Returns `true` when at least one embedder is registered.
    pub fn has_providers(&self) -> bool {
        !self.providers.is_empty()
    }

    /// Registry pre-loaded with a [`super::StubEmbedder`] under `"stub"`.
    #[cfg(any(test, feature = "mock"))]
    pub fn with_stub() -> Self {
        let mut registry = Self::new();
        registry.register("stub", Arc::new(super::StubEmbedder::new()));
        registry
    }
}
