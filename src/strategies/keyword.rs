//! Jaccard keyword-overlap similarity.

use std::collections::HashSet;

use async_trait::async_trait;

use super::{Strategy, StrategyError, StrategyKind, StrategyScore};
use crate::analysis::ContentType;
use crate::options::SimilarityOptions;

/// English stop words excluded from keyword sets.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was", "one",
    "our", "out", "has", "have", "this", "that", "with", "from", "they", "will", "would", "there",
    "their", "what", "about", "which", "when", "into", "than", "then", "them", "these", "some",
    "could", "other", "been", "its", "also", "does", "only", "very", "just", "over", "such",
];

/// Minimum token length by content type: code identifiers can be short and
/// meaningful, prose tokens under four characters are mostly noise.
const MIN_TOKEN_LEN_CODE: usize = 3;
const MIN_TOKEN_LEN_TEXT: usize = 4;

/// Jaccard similarity over filtered keyword sets.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordStrategy;

impl KeywordStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Extracts the keyword set for one content.
    ///
    /// Tokens split on non-alphanumerics; code tokens additionally split on
    /// `_` and camelCase boundaries so `parseConfigFile` and
    /// `parse_config_file` share keywords. Stop words and pure-numeric tokens
    /// are dropped.
    pub fn extract_keywords(content: &str, content_type: ContentType) -> HashSet<String> {
        let min_len = match content_type {
            ContentType::Code => MIN_TOKEN_LEN_CODE,
            _ => MIN_TOKEN_LEN_TEXT,
        };

        let mut keywords = HashSet::new();

        for raw in content.split(|c: char| !c.is_alphanumeric() && c != '_') {
            if raw.is_empty() {
                continue;
            }

            let parts: Vec<String> = if content_type == ContentType::Code {
                split_identifier(raw)
            } else {
                vec![raw.to_owned()]
            };

            for part in parts {
                let token = part.to_lowercase();
                if token.len() < min_len {
                    continue;
                }
                if token.chars().all(|c| c.is_ascii_digit()) {
                    continue;
                }
                if STOP_WORDS.contains(&token.as_str()) {
                    continue;
                }
                keywords.insert(token);
            }
        }

        keywords
    }

    fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
        let intersection = a.intersection(b).count();
        let union = a.union(b).count();

        // No keywords on either side carries no overlap signal.
        if union == 0 {
            return 0.0;
        }

        intersection as f32 / union as f32
    }
}

/// Splits an identifier on underscores and camelCase boundaries.
fn split_identifier(identifier: &str) -> Vec<String> {
    let mut parts = Vec::new();

    for chunk in identifier.split('_') {
        if chunk.is_empty() {
            continue;
        }

        let mut current = String::new();
        let mut prev_lower = false;

        for c in chunk.chars() {
            if c.is_uppercase() && prev_lower && !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
            current.push(c);
        }

        if !current.is_empty() {
            parts.push(current);
        }
    }

    parts
}

#[async_trait]
impl Strategy for KeywordStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Keyword
    }

    async fn calculate(
        &self,
        content1: &str,
        content2: &str,
        options: &SimilarityOptions,
    ) -> Result<StrategyScore, StrategyError> {
        let content_type = options.content_type.unwrap_or(ContentType::Generic);

        let keywords1 = Self::extract_keywords(content1, content_type);
        let keywords2 = Self::extract_keywords(content2, content_type);

        Ok(StrategyScore::computed(Self::jaccard(
            &keywords1, &keywords2,
        )))
    }

    fn is_supported(&self, _content_type: ContentType, _language: Option<&str>) -> bool {
        true
    }

    fn default_threshold(&self) -> f32 {
        0.6
    }
}
