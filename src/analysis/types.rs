use serde::{Deserialize, Serialize};

use crate::strategies::StrategyKind;

/// Coarse classification of a content pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Code,
    Document,
    Generic,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ContentType::Code => "code",
            ContentType::Document => "document",
            ContentType::Generic => "generic",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "code" => Ok(ContentType::Code),
            "document" => Ok(ContentType::Document),
            "generic" => Ok(ContentType::Generic),
            other => Err(format!("unknown content type: {other}")),
        }
    }
}

/// Complexity bucket derived from the heuristic score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
}

impl ComplexityLevel {
    /// Buckets a score: `< 0.3` low, `< 0.7` medium, else high.
    pub fn from_score(score: f32) -> Self {
        if score < 0.3 {
            ComplexityLevel::Low
        } else if score < 0.7 {
            ComplexityLevel::Medium
        } else {
            ComplexityLevel::High
        }
    }
}

/// Heuristic complexity assessment of a content pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityAssessment {
    /// Additive heuristic score clamped to `[0, 1]`.
    pub score: f32,
    /// Bucketed level.
    pub level: ComplexityLevel,
    /// Names of the heuristics that fired.
    pub factors: Vec<String>,
}

/// One extracted content feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentFeature {
    pub name: String,
    pub value: f32,
    pub weight: f32,
}

impl ContentFeature {
    pub fn new(name: impl Into<String>, value: f32, weight: f32) -> Self {
        Self {
            name: name.into(),
            value,
            weight,
        }
    }
}

/// Immutable output of one content analysis.
///
/// Cacheable: identical inputs and options always produce an identical
/// analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysisResult {
    /// Detected (or caller-forced) content type.
    pub content_type: ContentType,
    /// Average of the two input lengths, in bytes.
    pub content_length: usize,
    /// Heuristic complexity assessment.
    pub complexity: ComplexityAssessment,
    /// Caller-supplied language hint, passed through.
    pub language: Option<String>,
    /// Extracted features, in emission order.
    pub features: Vec<ContentFeature>,
    /// Strategies to run, cheapest-first, hybrid always last.
    pub recommended_strategies: Vec<StrategyKind>,
}

impl ContentAnalysisResult {
    /// Looks up a feature value by name.
    pub fn feature(&self, name: &str) -> Option<f32> {
        self.features
            .iter()
            .find(|feature| feature.name == name)
            .map(|feature| feature.value)
    }
}
