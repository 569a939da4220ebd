use std::sync::Arc;

use super::*;
use crate::analysis::{recommend_strategies, ComplexityAssessment, ComplexityLevel, ContentAnalysisResult, ContentType};
use crate::embedding::EmbedderRegistry;
use crate::strategies::{
    HybridStrategy, KeywordStrategy, LevenshteinStrategy, SemanticStrategy, StrategyKind,
    StrategyRegistry,
};
use crate::thresholds::ThresholdManager;

fn analysis(content_type: ContentType, level: ComplexityLevel, length: usize) -> ContentAnalysisResult {
    ContentAnalysisResult {
        content_type,
        content_length: length,
        complexity: ComplexityAssessment {
            score: match level {
                ComplexityLevel::Low => 0.1,
                ComplexityLevel::Medium => 0.5,
                ComplexityLevel::High => 0.8,
            },
            level,
            factors: vec![],
        },
        language: None,
        features: vec![],
        recommended_strategies: recommend_strategies(content_type, level),
    }
}

fn full_registry() -> Arc<StrategyRegistry> {
    let embedders = Arc::new(EmbedderRegistry::with_stub());
    let levenshtein = Arc::new(LevenshteinStrategy::new());
    let keyword = Arc::new(KeywordStrategy::new());
    let semantic = Arc::new(SemanticStrategy::new(embedders));

    let mut registry = StrategyRegistry::new();
    registry.register(levenshtein.clone());
    registry.register(keyword.clone());
    registry.register(semantic.clone());
    registry.register(Arc::new(HybridStrategy::new(levenshtein, semantic, keyword)));
    Arc::new(registry)
}

fn generator() -> PlanGenerator {
    PlanGenerator::new(Arc::new(ThresholdManager::new()), full_registry())
}

#[test]
fn test_plan_follows_recommendations_in_order() {
    let generator = generator();
    let analysis = analysis(ContentType::Code, ComplexityLevel::Low, 500);

    let plan = generator.generate(&analysis, &Default::default()).unwrap();

    let kinds: Vec<_> = plan
        .strategy_sequence
        .iter()
        .map(|step| step.strategy)
        .collect();
    assert_eq!(
        kinds,
        vec![
            StrategyKind::Keyword,
            StrategyKind::Levenshtein,
            StrategyKind::Hybrid
        ]
    );
}

#[test]
fn test_step_orders_are_dense_and_zero_based() {
    let generator = generator();
    let analysis = analysis(ContentType::Generic, ComplexityLevel::High, 500);

    let plan = generator.generate(&analysis, &Default::default()).unwrap();

    for (i, step) in plan.strategy_sequence.iter().enumerate() {
        assert_eq!(step.order, i);
    }
    assert!(plan.strategy_sequence[0].required);
}

#[test]
fn test_explicit_strategy_yields_single_step() {
    let generator = generator();
    let analysis = analysis(ContentType::Code, ComplexityLevel::Low, 500);
    let options = crate::options::SimilarityOptions::with_strategy(StrategyKind::Levenshtein);

    let plan = generator.generate(&analysis, &options).unwrap();

    assert_eq!(plan.strategy_sequence.len(), 1);
    assert_eq!(plan.strategy_sequence[0].strategy, StrategyKind::Levenshtein);
}

#[test]
fn test_unregistered_explicit_strategy_is_rejected() {
    let generator = generator();
    let analysis = analysis(ContentType::Code, ComplexityLevel::Low, 500);
    let options = crate::options::SimilarityOptions::with_strategy(StrategyKind::Structure);

    let result = generator.generate(&analysis, &options);
    assert!(matches!(
        result,
        Err(PlanError::StrategyNotSupported {
            kind: StrategyKind::Structure
        })
    ));
}

#[test]
fn test_unregistered_recommendations_are_dropped() {
    let mut registry = StrategyRegistry::new();
    registry.register(Arc::new(LevenshteinStrategy::new()));
    registry.register(Arc::new(KeywordStrategy::new()));
    let generator = PlanGenerator::new(Arc::new(ThresholdManager::new()), Arc::new(registry));

    // High-complexity generic content recommends semantic + hybrid too.
    let analysis = analysis(ContentType::Generic, ComplexityLevel::High, 500);
    let plan = generator.generate(&analysis, &Default::default()).unwrap();

    let kinds: Vec<_> = plan
        .strategy_sequence
        .iter()
        .map(|step| step.strategy)
        .collect();
    assert_eq!(kinds, vec![StrategyKind::Levenshtein, StrategyKind::Keyword]);
}

#[test]
fn test_semantic_step_carries_condition() {
    let generator = generator();
    let analysis = analysis(ContentType::Generic, ComplexityLevel::High, 500);

    let plan = generator.generate(&analysis, &Default::default()).unwrap();

    let semantic = plan
        .strategy_sequence
        .iter()
        .find(|step| step.strategy == StrategyKind::Semantic)
        .unwrap();
    let condition = semantic.condition.unwrap();

    assert!(condition.is_met(Some(0.5)));
    assert!(!condition.is_met(Some(0.1)));
    assert!(!condition.is_met(Some(0.99)));
    assert!(condition.is_met(None));
}

#[test]
fn test_weights_come_from_threshold_manager() {
    let thresholds = Arc::new(ThresholdManager::new());
    thresholds.set_strategy_threshold(StrategyKind::Keyword, ContentType::Code, 0.55);
    let generator = PlanGenerator::new(thresholds, full_registry());

    let analysis = analysis(ContentType::Code, ComplexityLevel::Low, 500);
    let plan = generator.generate(&analysis, &Default::default()).unwrap();

    let keyword = plan
        .strategy_sequence
        .iter()
        .find(|step| step.strategy == StrategyKind::Keyword)
        .unwrap();
    assert_eq!(keyword.weight, 0.55);
}

#[test]
fn test_time_estimate_scales_with_length() {
    let generator = generator();

    let short = analysis(ContentType::Code, ComplexityLevel::Low, 50);
    let medium = analysis(ContentType::Code, ComplexityLevel::Low, 500);
    let long = analysis(ContentType::Code, ComplexityLevel::Low, 5000);

    let short_plan = generator.generate(&short, &Default::default()).unwrap();
    let medium_plan = generator.generate(&medium, &Default::default()).unwrap();
    let long_plan = generator.generate(&long, &Default::default()).unwrap();

    assert!(short_plan.estimated_execution_time_ms < medium_plan.estimated_execution_time_ms);
    assert!(medium_plan.estimated_execution_time_ms < long_plan.estimated_execution_time_ms);
    // Hybrid steps push long content to the x2.5 multiplier.
    assert_eq!(
        long_plan.estimated_execution_time_ms,
        medium_plan.estimated_execution_time_ms * 2.5
    );
}

#[test]
fn test_remaining_cost_after() {
    let generator = generator();
    let analysis = analysis(ContentType::Code, ComplexityLevel::Low, 500);
    let plan = generator.generate(&analysis, &Default::default()).unwrap();

    // keyword (0.2), levenshtein (0.3), hybrid (0.9)
    let after_first = plan.remaining_cost_after(0);
    assert!((after_first - 1.2).abs() < 1e-6);

    let after_last = plan.remaining_cost_after(plan.strategy_sequence.len() - 1);
    assert_eq!(after_last, 0.0);
}

#[test]
fn test_cost_table_update() {
    let generator = generator();

    let original = generator.cost_for(StrategyKind::Semantic);
    assert_eq!(original.total, 0.8);

    generator.update_strategy_cost(
        StrategyKind::Semantic,
        StrategyCost::new(0.5, 0.4, 200.0, 0.5),
    );
    assert_eq!(generator.cost_for(StrategyKind::Semantic).total, 0.5);
    assert_eq!(
        generator.strategy_costs()[&StrategyKind::Semantic].time_ms,
        200.0
    );
}

#[test]
fn test_empty_registry_yields_error() {
    let generator = PlanGenerator::new(
        Arc::new(ThresholdManager::new()),
        Arc::new(StrategyRegistry::new()),
    );
    let analysis = analysis(ContentType::Generic, ComplexityLevel::Low, 100);

    assert!(matches!(
        generator.generate(&analysis, &Default::default()),
        Err(PlanError::EmptySequence)
    ));
}
