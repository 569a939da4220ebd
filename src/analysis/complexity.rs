//! Additive complexity heuristics.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::types::{ComplexityAssessment, ComplexityLevel};

/// Nesting shapes that each add 0.1, capped at 0.3 in total.
static NESTING_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("nested_braces", r"\{[^{}]*\{"),
        ("nested_parens", r"\([^()]*\("),
        ("nested_brackets", r"\[[^\[\]]*\["),
        (
            "nested_control_flow",
            r"\b(if|for|while)\b[^\n]*\n[^\n]*\b(if|for|while)\b",
        ),
    ]
    .iter()
    .map(|(name, pattern)| {
        (
            *name,
            Regex::new(pattern).expect("static nesting pattern must compile"),
        )
    })
    .collect()
});

const NESTING_CONTRIBUTION_CAP: f32 = 0.3;

/// Scores combined content against the complexity heuristics.
///
/// Each heuristic that fires contributes its fixed increment and records its
/// name as a factor; the sum is clamped to `[0, 1]`.
pub fn assess_complexity(combined: &str) -> ComplexityAssessment {
    let mut score = 0.0f32;
    let mut factors = Vec::new();

    let length = combined.chars().count();
    if length > 1000 {
        score += 0.3;
        factors.push("long_content".to_owned());
    } else if length > 500 {
        score += 0.2;
        factors.push("moderate_content".to_owned());
    }

    if length > 0 {
        let unique_chars: HashSet<char> = combined.chars().collect();
        if unique_chars.len() as f32 / length as f32 > 0.5 {
            score += 0.2;
            factors.push("character_diversity".to_owned());
        }
    }

    let words: Vec<&str> = combined.split_whitespace().collect();
    if !words.is_empty() {
        let unique_words: HashSet<&str> = words.iter().copied().collect();
        let repetition = 1.0 - unique_words.len() as f32 / words.len() as f32;
        if repetition > 0.3 {
            score += 0.1;
            factors.push("word_repetition".to_owned());
        }
    }

    let mut nesting = 0.0f32;
    for (name, pattern) in NESTING_PATTERNS.iter() {
        if pattern.is_match(combined) {
            nesting += 0.1;
            factors.push((*name).to_owned());
        }
    }
    score += nesting.min(NESTING_CONTRIBUTION_CAP);

    if length > 0 {
        let special = combined
            .chars()
            .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
            .count();
        if special as f32 / length as f32 > 0.2 {
            score += 0.1;
            factors.push("special_character_density".to_owned());
        }
    }

    let score = score.clamp(0.0, 1.0);

    ComplexityAssessment {
        score,
        level: ComplexityLevel::from_score(score),
        factors,
    }
}
