use std::sync::Arc;

use super::detect::{code_pattern_score, detect_content_type, document_pattern_score};
use super::*;
use crate::cache::MemoryCache;
use crate::options::SimilarityOptions;
use crate::strategies::StrategyKind;

const JS_SNIPPET: &str = r#"
function add(a, b) {
    // sum two numbers
    return a + b;
}

const total = add(1, 2);
"#;

const MARKDOWN_SNIPPET: &str = r#"
# Release notes

- faster startup
- lower memory use

See the [changelog](https://example.com/changelog) for details.
"#;

fn options_with_language(language: &str) -> SimilarityOptions {
    SimilarityOptions {
        language: Some(language.to_owned()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_language_hint_forces_code() {
    let analyzer = ContentAnalyzer::new();
    let result = analyzer
        .analyze("x", "y", &options_with_language("javascript"))
        .await;

    assert_eq!(result.content_type, ContentType::Code);
    assert_eq!(result.language.as_deref(), Some("javascript"));
}

#[tokio::test]
async fn test_unknown_language_falls_through_to_detection() {
    let analyzer = ContentAnalyzer::new();
    let result = analyzer
        .analyze("plain words", "more words", &options_with_language("klingon"))
        .await;

    assert_eq!(result.content_type, ContentType::Generic);
}

#[tokio::test]
async fn test_detects_code_from_syntax() {
    let analyzer = ContentAnalyzer::new();
    let result = analyzer
        .analyze(JS_SNIPPET, JS_SNIPPET, &SimilarityOptions::default())
        .await;

    assert_eq!(result.content_type, ContentType::Code);
    assert!(result.feature("function_count").unwrap() >= 1.0);
}

#[tokio::test]
async fn test_detects_document_from_markers() {
    let analyzer = ContentAnalyzer::new();
    let result = analyzer
        .analyze(
            MARKDOWN_SNIPPET,
            MARKDOWN_SNIPPET,
            &SimilarityOptions::default(),
        )
        .await;

    assert_eq!(result.content_type, ContentType::Document);
    assert!(result.feature("heading_count").unwrap() >= 1.0);
    assert!(result.feature("list_item_count").unwrap() >= 2.0);
    assert!(result.feature("link_count").unwrap() >= 1.0);
}

#[tokio::test]
async fn test_plain_prose_is_generic() {
    let analyzer = ContentAnalyzer::new();
    let result = analyzer
        .analyze(
            "The quick brown fox jumps over the lazy dog.",
            "A different sentence about foxes.",
            &SimilarityOptions::default(),
        )
        .await;

    assert_eq!(result.content_type, ContentType::Generic);
    assert!(result.feature("sentence_count").is_some());
    assert!(result.feature("punctuation_density").is_some());
}

#[tokio::test]
async fn test_explicit_content_type_skips_detection() {
    let analyzer = ContentAnalyzer::new();
    let options = SimilarityOptions {
        content_type: Some(ContentType::Document),
        ..Default::default()
    };

    let result = analyzer.analyze(JS_SNIPPET, JS_SNIPPET, &options).await;
    assert_eq!(result.content_type, ContentType::Document);
}

#[tokio::test]
async fn test_analysis_is_deterministic() {
    let analyzer = ContentAnalyzer::new();
    let options = SimilarityOptions::default();

    let first = analyzer.analyze(JS_SNIPPET, MARKDOWN_SNIPPET, &options).await;
    let second = analyzer.analyze(JS_SNIPPET, MARKDOWN_SNIPPET, &options).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_cached_analysis_round_trips() {
    let cache = Arc::new(MemoryCache::new());
    let analyzer = ContentAnalyzer::with_cache(cache.clone());
    let options = SimilarityOptions::default();

    let first = analyzer.analyze(JS_SNIPPET, MARKDOWN_SNIPPET, &options).await;
    let second = analyzer.analyze(JS_SNIPPET, MARKDOWN_SNIPPET, &options).await;

    assert_eq!(first, second);
    assert!(!cache.is_empty());
}

#[test]
fn test_code_pattern_score_thresholds() {
    assert!(code_pattern_score(JS_SNIPPET) >= 3);
    assert!(code_pattern_score("just some words") < 3);
}

#[test]
fn test_document_pattern_score_thresholds() {
    assert!(document_pattern_score(MARKDOWN_SNIPPET) >= 2);
    assert!(document_pattern_score("just some words") < 2);
}

#[test]
fn test_detect_content_type_priority() {
    // Language hint beats syntax detection.
    assert_eq!(
        detect_content_type("# heading\n- list", Some("rust")),
        ContentType::Code
    );
}

#[test]
fn test_complexity_levels() {
    assert_eq!(ComplexityLevel::from_score(0.0), ComplexityLevel::Low);
    assert_eq!(ComplexityLevel::from_score(0.29), ComplexityLevel::Low);
    assert_eq!(ComplexityLevel::from_score(0.3), ComplexityLevel::Medium);
    assert_eq!(ComplexityLevel::from_score(0.69), ComplexityLevel::Medium);
    assert_eq!(ComplexityLevel::from_score(0.7), ComplexityLevel::High);
    assert_eq!(ComplexityLevel::from_score(1.0), ComplexityLevel::High);
}

#[test]
fn test_long_content_raises_complexity() {
    let short = super::complexity::assess_complexity("tiny");
    let long = super::complexity::assess_complexity(&"abcdefgh ".repeat(200));

    assert!(long.score > short.score);
    assert!(long.factors.iter().any(|f| f == "long_content"));
}

#[test]
fn test_recommendation_table() {
    use ComplexityLevel::*;
    use StrategyKind::*;

    assert_eq!(
        recommend_strategies(ContentType::Code, Low),
        vec![Keyword, Levenshtein, Hybrid]
    );
    assert_eq!(
        recommend_strategies(ContentType::Code, High),
        vec![Keyword, Levenshtein, Semantic, Hybrid]
    );
    assert_eq!(
        recommend_strategies(ContentType::Document, Low),
        vec![Semantic, Keyword, Hybrid]
    );
    assert_eq!(
        recommend_strategies(ContentType::Document, Medium),
        vec![Semantic, Keyword, Levenshtein, Hybrid]
    );
    assert_eq!(
        recommend_strategies(ContentType::Generic, Low),
        vec![Levenshtein, Keyword, Hybrid]
    );
    assert_eq!(
        recommend_strategies(ContentType::Generic, High),
        vec![Levenshtein, Keyword, Semantic, Hybrid]
    );
}

#[test]
fn test_hybrid_is_always_last() {
    for content_type in [ContentType::Code, ContentType::Document, ContentType::Generic] {
        for level in [
            ComplexityLevel::Low,
            ComplexityLevel::Medium,
            ComplexityLevel::High,
        ] {
            let strategies = recommend_strategies(content_type, level);
            assert_eq!(strategies.last(), Some(&StrategyKind::Hybrid));
        }
    }
}
