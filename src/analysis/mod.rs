//! Content analysis: classification, complexity, features, strategy
//! recommendation.
//!
//! [`ContentAnalyzer::analyze`] is deterministic for identical inputs and
//! options, which makes results safely cacheable; the analyzer consults its
//! [`CacheStore`] first and stores misses with a TTL.

mod complexity;
mod detect;
mod features;
mod types;

#[cfg(test)]
mod tests;

pub use types::{
    ComplexityAssessment, ComplexityLevel, ContentAnalysisResult, ContentFeature, ContentType,
};

pub(crate) use detect::code_pattern_score;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::CacheStore;
use crate::constants::ANALYSIS_CACHE_TTL_SECS;
use crate::hashing::{hash_analysis_key, hash_to_hex};
use crate::options::SimilarityOptions;
use crate::strategies::StrategyKind;

use complexity::assess_complexity;
use detect::detect_content_type;
use features::extract_features;

/// Classifies content pairs and recommends a strategy sequence.
pub struct ContentAnalyzer {
    cache: Option<Arc<dyn CacheStore>>,
    cache_ttl: Duration,
}

impl std::fmt::Debug for ContentAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentAnalyzer")
            .field("cached", &self.cache.is_some())
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl ContentAnalyzer {
    /// Analyzer without result caching.
    pub fn new() -> Self {
        Self {
            cache: None,
            cache_ttl: Duration::from_secs(ANALYSIS_CACHE_TTL_SECS),
        }
    }

    /// Analyzer that memoizes results in `cache`.
    pub fn with_cache(cache: Arc<dyn CacheStore>) -> Self {
        Self {
            cache: Some(cache),
            cache_ttl: Duration::from_secs(ANALYSIS_CACHE_TTL_SECS),
        }
    }

    /// Overrides the cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Analyzes a content pair.
    ///
    /// Cache failures are logged and ignored: analysis is pure computation and
    /// must never fail a comparison.
    pub async fn analyze(
        &self,
        content1: &str,
        content2: &str,
        options: &SimilarityOptions,
    ) -> ContentAnalysisResult {
        let cache_key = self.cache.as_ref().map(|_| {
            let hash = hash_analysis_key(content1, content2, &options.cache_fingerprint());
            format!("analysis:{}", hash_to_hex(&hash))
        });

        if let (Some(cache), Some(key)) = (self.cache.as_deref(), cache_key.as_deref()) {
            match cache.get(key).await {
                Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                    Ok(result) => {
                        debug!(key, "Analysis cache hit");
                        return result;
                    }
                    Err(error) => warn!(key, %error, "Discarding undecodable cached analysis"),
                },
                Ok(None) => {}
                Err(error) => warn!(key, %error, "Analysis cache read failed"),
            }
        }

        let result = self.analyze_uncached(content1, content2, options);

        if let (Some(cache), Some(key)) = (self.cache.as_deref(), cache_key.as_deref()) {
            match serde_json::to_vec(&result) {
                Ok(bytes) => {
                    if let Err(error) = cache.set(key, bytes, Some(self.cache_ttl)).await {
                        warn!(key, %error, "Analysis cache write failed");
                    }
                }
                Err(error) => warn!(%error, "Analysis result serialization failed"),
            }
        }

        result
    }

    fn analyze_uncached(
        &self,
        content1: &str,
        content2: &str,
        options: &SimilarityOptions,
    ) -> ContentAnalysisResult {
        // Classification looks at both inputs at once.
        let combined = format!("{content1}\n{content2}");
        let avg_length = (content1.len() + content2.len()) / 2;

        let content_type = options
            .content_type
            .unwrap_or_else(|| detect_content_type(&combined, options.language.as_deref()));

        let complexity = assess_complexity(&combined);
        let features = extract_features(&combined, avg_length, content_type);
        let recommended_strategies = recommend_strategies(content_type, complexity.level);

        debug!(
            %content_type,
            complexity_score = complexity.score,
            complexity_level = ?complexity.level,
            strategies = recommended_strategies.len(),
            "Content analyzed"
        );

        ContentAnalysisResult {
            content_type,
            content_length: avg_length,
            complexity,
            language: options.language.clone(),
            features,
            recommended_strategies,
        }
    }
}

impl Default for ContentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Strategy recommendation table.
///
/// Cheap strategies lead; semantic joins for complex content; hybrid is
/// always the final fallback.
pub fn recommend_strategies(
    content_type: ContentType,
    complexity: ComplexityLevel,
) -> Vec<StrategyKind> {
    let mut strategies = match content_type {
        ContentType::Code => vec![StrategyKind::Keyword, StrategyKind::Levenshtein],
        ContentType::Document => vec![StrategyKind::Semantic, StrategyKind::Keyword],
        ContentType::Generic => vec![StrategyKind::Levenshtein, StrategyKind::Keyword],
    };

    match content_type {
        ContentType::Code | ContentType::Generic => {
            if complexity == ComplexityLevel::High {
                strategies.push(StrategyKind::Semantic);
            }
        }
        ContentType::Document => {
            if complexity != ComplexityLevel::Low {
                strategies.push(StrategyKind::Levenshtein);
            }
        }
    }

    strategies.push(StrategyKind::Hybrid);
    strategies
}
