//! Feature extraction.
//!
//! Every analysis carries the base features (length, line count, word count);
//! type-specific features are appended after classification.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{ContentFeature, ContentType};

static FUNCTION_DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bfunction\s+\w+|\bfn\s+\w+|\bdef\s+\w+").expect("static pattern must compile")
});

static CLASS_DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bclass\s+\w+|\bstruct\s+\w+|\binterface\s+\w+")
        .expect("static pattern must compile")
});

static COMMENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(//|/\*|\*|#)").expect("static pattern must compile")
});

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s+\S").expect("static pattern must compile"));

static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:[-*+]|\d+\.)\s+\S").expect("static pattern must compile")
});

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]\n]+\]\([^)\n]+\)").expect("static pattern must compile"));

/// Emits base features followed by type-specific ones.
pub fn extract_features(
    combined: &str,
    avg_length: usize,
    content_type: ContentType,
) -> Vec<ContentFeature> {
    let lines: Vec<&str> = combined.lines().collect();
    let word_count = combined.split_whitespace().count();

    let mut features = vec![
        ContentFeature::new("length", avg_length as f32, 0.3),
        ContentFeature::new("line_count", lines.len() as f32, 0.3),
        ContentFeature::new("word_count", word_count as f32, 0.4),
    ];

    match content_type {
        ContentType::Code => extract_code_features(combined, &lines, &mut features),
        ContentType::Document => extract_document_features(combined, &mut features),
        ContentType::Generic => extract_generic_features(combined, &mut features),
    }

    features
}

fn extract_code_features(combined: &str, lines: &[&str], features: &mut Vec<ContentFeature>) {
    let function_count = FUNCTION_DEF.find_iter(combined).count();
    let class_count = CLASS_DEF.find_iter(combined).count();

    let comment_lines = lines
        .iter()
        .filter(|line| COMMENT_LINE.is_match(line))
        .count();
    let comment_ratio = if lines.is_empty() {
        0.0
    } else {
        comment_lines as f32 / lines.len() as f32
    };

    features.push(ContentFeature::new(
        "function_count",
        function_count as f32,
        1.0,
    ));
    features.push(ContentFeature::new("class_count", class_count as f32, 1.0));
    features.push(ContentFeature::new("comment_ratio", comment_ratio, 0.5));
    features.push(ContentFeature::new(
        "max_nesting_depth",
        max_nesting_depth(combined) as f32,
        0.8,
    ));
}

fn extract_document_features(combined: &str, features: &mut Vec<ContentFeature>) {
    let heading_count = HEADING.find_iter(combined).count();
    let list_item_count = LIST_ITEM.find_iter(combined).count();
    let link_count = LINK.find_iter(combined).count();
    let code_block_count = combined.matches("```").count() / 2;

    features.push(ContentFeature::new(
        "heading_count",
        heading_count as f32,
        1.0,
    ));
    features.push(ContentFeature::new(
        "list_item_count",
        list_item_count as f32,
        0.8,
    ));
    features.push(ContentFeature::new("link_count", link_count as f32, 0.5));
    features.push(ContentFeature::new(
        "code_block_count",
        code_block_count as f32,
        0.8,
    ));
}

fn extract_generic_features(combined: &str, features: &mut Vec<ContentFeature>) {
    let sentence_count = combined
        .split(['.', '!', '?'])
        .filter(|part| !part.trim().is_empty())
        .count();

    let paragraph_count = combined
        .split("\n\n")
        .filter(|part| !part.trim().is_empty())
        .count();

    let length = combined.chars().count();
    let punctuation = combined.chars().filter(|c| c.is_ascii_punctuation()).count();
    let punctuation_density = if length == 0 {
        0.0
    } else {
        punctuation as f32 / length as f32
    };

    features.push(ContentFeature::new(
        "sentence_count",
        sentence_count as f32,
        1.0,
    ));
    features.push(ContentFeature::new(
        "paragraph_count",
        paragraph_count as f32,
        0.8,
    ));
    features.push(ContentFeature::new(
        "punctuation_density",
        punctuation_density,
        0.5,
    ));
}

/// Deepest brace nesting, scanning left to right.
fn max_nesting_depth(content: &str) -> usize {
    let mut depth: usize = 0;
    let mut max_depth: usize = 0;

    for c in content.chars() {
        match c {
            '{' => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    max_depth
}
