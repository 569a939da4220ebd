use std::sync::Arc;

use super::*;
use crate::analysis::ContentType;
use crate::cache::MemoryCache;
use crate::embedding::EmbedderRegistry;
use crate::options::{HybridWeights, SimilarityOptions};

fn stub_semantic() -> SemanticStrategy {
    SemanticStrategy::new(Arc::new(EmbedderRegistry::with_stub()))
}

fn hybrid_over_stub() -> HybridStrategy {
    HybridStrategy::new(
        Arc::new(LevenshteinStrategy::new()),
        Arc::new(stub_semantic()),
        Arc::new(KeywordStrategy::new()),
    )
}

#[test]
fn test_kind_round_trips_through_str() {
    for kind in StrategyKind::ALL {
        let parsed: StrategyKind = kind.as_str().parse().unwrap();
        assert_eq!(parsed, kind);
    }
    assert!("nonsense".parse::<StrategyKind>().is_err());
}

#[test]
fn test_registry_register_and_resolve() {
    let mut registry = StrategyRegistry::new();
    registry.register(Arc::new(LevenshteinStrategy::new()));
    registry.register(Arc::new(KeywordStrategy::new()));

    assert!(registry.contains(StrategyKind::Levenshtein));
    assert!(registry.contains(StrategyKind::Keyword));
    assert!(!registry.contains(StrategyKind::Semantic));
    assert_eq!(
        registry.get(StrategyKind::Levenshtein).unwrap().kind(),
        StrategyKind::Levenshtein
    );
    assert!(registry.get(StrategyKind::Structure).is_none());
}

#[tokio::test]
async fn test_levenshtein_identical_content() {
    let strategy = LevenshteinStrategy::new();
    let score = strategy
        .calculate("fn main() {}", "fn main() {}", &SimilarityOptions::default())
        .await
        .unwrap();
    assert!((score.similarity - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_levenshtein_normalization_ignores_comments_and_case() {
    let strategy = LevenshteinStrategy::new();
    let score = strategy
        .calculate(
            "let X = 1; // init\nlet y = 2;",
            "LET x = 1;   let Y = 2;",
            &SimilarityOptions::default(),
        )
        .await
        .unwrap();
    assert!((score.similarity - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_levenshtein_symmetry() {
    let strategy = LevenshteinStrategy::new();
    let options = SimilarityOptions::default();

    let ab = strategy.calculate("kitten", "sitting", &options).await.unwrap();
    let ba = strategy.calculate("sitting", "kitten", &options).await.unwrap();

    assert_eq!(ab.similarity, ba.similarity);
    assert!(ab.similarity > 0.0 && ab.similarity < 1.0);
}

#[tokio::test]
async fn test_levenshtein_empty_inputs() {
    let strategy = LevenshteinStrategy::new();
    let options = SimilarityOptions::default();

    let both = strategy.calculate("", "", &options).await.unwrap();
    assert_eq!(both.similarity, 1.0);

    let one = strategy.calculate("", "content", &options).await.unwrap();
    assert_eq!(one.similarity, 0.0);
}

#[tokio::test]
async fn test_keyword_overlap_on_shared_identifiers() {
    let strategy = KeywordStrategy::new();
    let options = SimilarityOptions {
        content_type: Some(ContentType::Code),
        ..Default::default()
    };

    let score = strategy
        .calculate(
            "function parseConfigFile(path) { return readFile(path); }",
            "function parse_config_file(path) { return read_file(path); }",
            &options,
        )
        .await
        .unwrap();

    // Identifier splitting aligns camelCase with snake_case.
    assert!(score.similarity > 0.8, "got {}", score.similarity);
}

#[tokio::test]
async fn test_keyword_disjoint_content_scores_zero() {
    let strategy = KeywordStrategy::new();
    let score = strategy
        .calculate(
            "astronomy telescope galaxies",
            "cooking recipes ingredients",
            &SimilarityOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(score.similarity, 0.0);
}

#[tokio::test]
async fn test_keyword_symmetry() {
    let strategy = KeywordStrategy::new();
    let options = SimilarityOptions::default();

    let ab = strategy
        .calculate("alpha beta gamma", "beta gamma delta", &options)
        .await
        .unwrap();
    let ba = strategy
        .calculate("beta gamma delta", "alpha beta gamma", &options)
        .await
        .unwrap();

    assert_eq!(ab.similarity, ba.similarity);
}

#[test]
fn test_keyword_extraction_filters() {
    let keywords =
        KeywordStrategy::extract_keywords("The value 12345 exceeds threshold", ContentType::Generic);

    assert!(!keywords.contains("the"));
    assert!(!keywords.contains("12345"));
    assert!(keywords.contains("value"));
    assert!(keywords.contains("exceeds"));
    assert!(keywords.contains("threshold"));
}

#[tokio::test]
async fn test_semantic_identical_content_scores_one() {
    let strategy = stub_semantic();
    let score = strategy
        .calculate(
            "a reasonably long sentence about similarity",
            "a reasonably long sentence about similarity",
            &SimilarityOptions::default(),
        )
        .await
        .unwrap();
    assert!((score.similarity - 1.0).abs() < 1e-4);
}

#[tokio::test]
async fn test_semantic_short_input_uses_keyword_fallback() {
    let strategy = stub_semantic();
    // Both inputs below the 10-char minimum; their only token is too short to
    // survive keyword filtering, so the fallback yields no overlap signal.
    let score = strategy
        .calculate("abc", "abc", &SimilarityOptions::default())
        .await
        .unwrap();
    assert_eq!(score.similarity, 0.0);
    assert!(!score.cache_hit);
}

#[tokio::test]
async fn test_semantic_missing_provider_falls_back() {
    let strategy = SemanticStrategy::new(Arc::new(EmbedderRegistry::new()));
    let score = strategy
        .calculate(
            "shared words in this sentence",
            "shared words in this sentence",
            &SimilarityOptions::default(),
        )
        .await
        .unwrap();
    // Fallback is keyword overlap; identical keyword sets score 1.
    assert_eq!(score.similarity, 1.0);
}

#[tokio::test]
async fn test_semantic_cache_hit_flag() {
    let cache = Arc::new(MemoryCache::new());
    let strategy =
        SemanticStrategy::with_cache(Arc::new(EmbedderRegistry::with_stub()), cache);
    let options = SimilarityOptions::default();

    let first = strategy
        .calculate(
            "first piece of content here",
            "second piece of content here",
            &options,
        )
        .await
        .unwrap();
    assert!(!first.cache_hit);

    let second = strategy
        .calculate(
            "first piece of content here",
            "second piece of content here",
            &options,
        )
        .await
        .unwrap();
    assert!(second.cache_hit);
    assert!((first.similarity - second.similarity).abs() < 1e-6);
}

#[tokio::test]
async fn test_hybrid_blends_and_exposes_subs() {
    let hybrid = hybrid_over_stub();

    assert_eq!(hybrid.sub_strategies().map(|subs| subs.len()), Some(3));
    assert!(LevenshteinStrategy::new().sub_strategies().is_none());

    let score = hybrid
        .calculate(
            "function add(a, b) { return a + b; }",
            "function add(a, b) { return a + b; }",
            &SimilarityOptions::default(),
        )
        .await
        .unwrap();
    assert!((score.similarity - 1.0).abs() < 1e-3);
}

#[tokio::test]
async fn test_hybrid_custom_weights_renormalize() {
    let hybrid = hybrid_over_stub();
    let options = SimilarityOptions {
        // Heavily favor the levenshtein component.
        weights: Some(HybridWeights {
            content: 10.0,
            semantic: 0.0,
            keywords: 0.0,
        }),
        ..Default::default()
    };

    let score = hybrid
        .calculate("identical text", "identical text", &options)
        .await
        .unwrap();
    assert!((score.similarity - 1.0).abs() < 1e-3);
}

#[tokio::test]
async fn test_hybrid_survives_failing_sub_strategy() {
    // Registry without embedders makes the semantic sub fall back internally;
    // pair it with an empty-provider registry to exercise the degraded path.
    let hybrid = HybridStrategy::new(
        Arc::new(LevenshteinStrategy::new()),
        Arc::new(SemanticStrategy::new(Arc::new(EmbedderRegistry::new()))),
        Arc::new(KeywordStrategy::new()),
    );

    let score = hybrid
        .calculate(
            "some long enough content for semantics",
            "some long enough content for semantics",
            &SimilarityOptions::default(),
        )
        .await
        .unwrap();

    assert!(score.similarity > 0.9);
}

#[tokio::test]
async fn test_all_strategies_stay_in_range() {
    let strategies: Vec<Arc<dyn Strategy>> = vec![
        Arc::new(LevenshteinStrategy::new()),
        Arc::new(KeywordStrategy::new()),
        Arc::new(stub_semantic()),
        Arc::new(hybrid_over_stub()),
    ];

    let pairs = [
        ("", ""),
        ("a", "b"),
        ("identical content here", "identical content here"),
        ("completely different", "nothing shared at all ok"),
    ];

    for strategy in &strategies {
        for (a, b) in pairs {
            let score = strategy
                .calculate(a, b, &SimilarityOptions::default())
                .await
                .unwrap();
            assert!(
                (0.0..=1.0).contains(&score.similarity),
                "{} out of range on ({a:?}, {b:?})",
                strategy.kind()
            );
        }
    }
}

#[test]
fn test_default_thresholds() {
    assert_eq!(LevenshteinStrategy::new().default_threshold(), 0.85);
    assert_eq!(KeywordStrategy::new().default_threshold(), 0.6);
    assert_eq!(stub_semantic().default_threshold(), 0.75);
    assert_eq!(hybrid_over_stub().default_threshold(), 0.7);
}
