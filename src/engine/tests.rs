use std::sync::Arc;

use super::*;
use crate::embedding::EmbedderRegistry;

fn engine() -> SimilarityEngine {
    SimilarityEngine::builder()
        .embedders(EmbedderRegistry::with_stub())
        .build()
        .expect("engine should build")
}

fn near_duplicate_items() -> Vec<String> {
    // Items 0/2 and 3/4 differ by one character; item 1 is unique.
    vec![
        "the quick brown fox jumps over the lazy dog".to_owned(),
        "completely unrelated text snippet here".to_owned(),
        "the quick brown fox jumps over the lazy dogs".to_owned(),
        "rust makes systems programming approachable".to_owned(),
        "rust makes systems programming approachable!".to_owned(),
    ]
}

fn levenshtein_options() -> SimilarityOptions {
    SimilarityOptions::with_strategy(StrategyKind::Levenshtein)
}

#[tokio::test]
async fn test_builder_defaults_produce_working_engine() {
    // No embedders at all: semantic degrades internally, everything else
    // works.
    let engine = SimilarityEngine::builder().build().unwrap();

    let report = engine
        .calculate_similarity(
            "some content to compare",
            "some content to compare against",
            &SimilarityOptions::default(),
        )
        .await
        .unwrap();

    assert!((0.0..=1.0).contains(&report.similarity));
}

#[tokio::test]
async fn test_identical_content_through_facade() {
    let engine = engine();

    let report = engine
        .calculate_similarity("same", "same", &SimilarityOptions::default())
        .await
        .unwrap();

    assert_eq!(report.similarity, 1.0);
    assert!(report.execution.early_exit);
    assert_eq!(report.execution.executed_strategies, 0);
}

#[tokio::test]
async fn test_is_similar_uses_threshold() {
    let engine = engine();

    assert!(engine
        .is_similar("duplicate text", "duplicate text", &SimilarityOptions::default())
        .await
        .unwrap());

    let dissimilar = engine
        .is_similar(
            "first completely distinct content",
            "unrelated second blob of words",
            &SimilarityOptions::with_threshold(0.99),
        )
        .await
        .unwrap();
    assert!(!dissimilar);
}

#[tokio::test]
async fn test_batch_similarity_matrix_shape() {
    let engine = engine();

    let result = engine
        .calculate_batch_similarity(
            &["a".to_owned(), "a".to_owned(), "b".to_owned()],
            &levenshtein_options(),
        )
        .await
        .unwrap();

    assert_eq!(result.matrix.len(), 3);
    for (i, row) in result.matrix.iter().enumerate() {
        assert_eq!(row[i], 1.0);
    }
    assert_eq!(result.matrix[0][1], 1.0);
    assert!(result.matrix[0][2] < 1.0);
}

#[tokio::test]
async fn test_batch_errors_surface_stable_codes() {
    let engine = engine();

    let error = engine
        .calculate_batch_similarity(&["one".to_owned()], &SimilarityOptions::default())
        .await
        .unwrap_err();
    assert_eq!(error.code(), "INSUFFICIENT_INPUT");
    assert_eq!(error.details()["count"], 1);

    let error = engine
        .calculate_similarity("", "x", &SimilarityOptions::default())
        .await
        .unwrap_err();
    assert_eq!(error.code(), "INVALID_INPUT");

    let error = engine
        .calculate_similarity("a", "b", &SimilarityOptions::with_threshold(-0.2))
        .await
        .unwrap_err();
    assert_eq!(error.code(), "INVALID_THRESHOLD");
}

#[tokio::test]
async fn test_unregistered_structure_strategy_is_rejected_at_planning() {
    let engine = engine();

    let error = engine
        .calculate_similarity(
            "left side content",
            "right side content",
            &SimilarityOptions::with_strategy(StrategyKind::Structure),
        )
        .await
        .unwrap_err();

    assert_eq!(error.code(), "STRATEGY_NOT_SUPPORTED");
    assert_eq!(error.details()["strategy"], "structure");
}

#[tokio::test]
async fn test_filter_similar_items_keeps_first_seen() {
    let engine = engine();

    let kept = engine
        .filter_similar_items(&near_duplicate_items(), 0.9, &levenshtein_options())
        .await
        .unwrap();

    assert_eq!(
        kept,
        vec![
            "the quick brown fox jumps over the lazy dog".to_owned(),
            "completely unrelated text snippet here".to_owned(),
            "rust makes systems programming approachable".to_owned(),
        ]
    );
}

#[tokio::test]
async fn test_filter_passes_small_inputs_through() {
    let engine = engine();

    let one = vec!["only item".to_owned()];
    let kept = engine
        .filter_similar_items(&one, 0.8, &SimilarityOptions::default())
        .await
        .unwrap();
    assert_eq!(kept, one);
}

#[tokio::test]
async fn test_find_similarity_groups_scenario() {
    let engine = engine();

    let groups = engine
        .find_similarity_groups(&near_duplicate_items(), 0.9, &levenshtein_options())
        .await
        .unwrap();

    // Exactly two clusters of two; the unique item appears nowhere.
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].id, 0);
    assert_eq!(groups[0].member_indices, vec![0, 2]);
    assert_eq!(groups[1].id, 1);
    assert_eq!(groups[1].member_indices, vec![3, 4]);
    assert!(groups.iter().all(|group| !group.member_indices.contains(&1)));
}

#[tokio::test]
async fn test_find_similarity_groups_rejects_bad_threshold() {
    let engine = engine();

    let error = engine
        .find_similarity_groups(&near_duplicate_items(), 1.5, &SimilarityOptions::default())
        .await
        .unwrap_err();
    assert_eq!(error.code(), "INVALID_THRESHOLD");
}

#[tokio::test]
async fn test_coordinator_stats_flow_through() {
    let engine = engine();

    engine
        .calculate_similarity("same", "same", &SimilarityOptions::default())
        .await
        .unwrap();

    let stats = engine.coordinator_stats();
    assert_eq!(stats.total_calculations, 1);
}

#[tokio::test]
async fn test_cost_table_round_trips_through_facade() {
    let engine = engine();

    let costs = engine.strategy_costs();
    assert_eq!(costs[&StrategyKind::Semantic].total, 0.8);

    engine.update_strategy_cost(
        StrategyKind::Semantic,
        StrategyCost::new(0.6, 0.5, 250.0, 0.6),
    );
    assert_eq!(engine.strategy_costs()[&StrategyKind::Semantic].total, 0.6);
}
