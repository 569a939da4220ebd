//! Edit-distance similarity.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use super::{Strategy, StrategyError, StrategyKind, StrategyScore};
use crate::analysis::ContentType;
use crate::options::SimilarityOptions;

static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//[^\n]*|#[^\n]*").expect("static pattern must compile"));

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("static pattern must compile"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static pattern must compile"));

/// Normalized Levenshtein similarity over comment-stripped, case-folded,
/// whitespace-collapsed content.
#[derive(Debug, Default, Clone, Copy)]
pub struct LevenshteinStrategy;

impl LevenshteinStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Canonical form compared by this strategy: comments out, whitespace
    /// runs collapsed to one space, lowercased.
    fn normalize(content: &str) -> String {
        let without_blocks = BLOCK_COMMENT.replace_all(content, " ");
        let without_lines = LINE_COMMENT.replace_all(&without_blocks, " ");
        WHITESPACE_RUN
            .replace_all(without_lines.trim(), " ")
            .to_lowercase()
    }
}

#[async_trait]
impl Strategy for LevenshteinStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Levenshtein
    }

    async fn calculate(
        &self,
        content1: &str,
        content2: &str,
        _options: &SimilarityOptions,
    ) -> Result<StrategyScore, StrategyError> {
        let normalized1 = Self::normalize(content1);
        let normalized2 = Self::normalize(content2);

        let similarity = match (normalized1.is_empty(), normalized2.is_empty()) {
            (true, true) => 1.0,
            (true, false) | (false, true) => 0.0,
            (false, false) => {
                strsim::normalized_levenshtein(&normalized1, &normalized2) as f32
            }
        };

        Ok(StrategyScore::computed(similarity.clamp(0.0, 1.0)))
    }

    fn is_supported(&self, _content_type: ContentType, _language: Option<&str>) -> bool {
        true
    }

    fn default_threshold(&self) -> f32 {
        0.85
    }
}
