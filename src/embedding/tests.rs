use std::sync::Arc;

use super::{cosine_similarity, validate_embedding_dim, Embedder, EmbedderRegistry, StubEmbedder};

#[tokio::test]
async fn test_stub_embeddings_are_deterministic() {
    let embedder = StubEmbedder::new();
    let texts = vec!["hello world".to_owned()];

    let first = embedder.embed(&texts).await.unwrap();
    let second = embedder.embed(&texts).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_stub_embeddings_are_normalized() {
    let embedder = StubEmbedder::new();
    let texts = vec!["normalize me".to_owned()];

    let vectors = embedder.embed(&texts).await.unwrap();
    let norm: f32 = vectors[0].iter().map(|x| x * x).sum::<f32>().sqrt();

    assert!((norm - 1.0).abs() < 1e-4);
}

#[tokio::test]
async fn test_stub_counts_bulk_calls() {
    let embedder = StubEmbedder::new();

    let batch: Vec<String> = (0..7).map(|i| format!("text {i}")).collect();
    embedder.embed(&batch).await.unwrap();

    assert_eq!(embedder.bulk_calls(), 1);
    assert_eq!(embedder.texts_embedded(), 7);
}

#[tokio::test]
async fn test_stub_rejects_empty_input() {
    let embedder = StubEmbedder::new();
    assert!(embedder.embed(&[]).await.is_err());
}

#[test]
fn test_cosine_identical_vectors() {
    let v = vec![0.5, -0.3, 0.8];
    assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
}

#[test]
fn test_cosine_orthogonal_vectors() {
    let a = vec![1.0, 0.0];
    let b = vec![0.0, 1.0];
    assert!(cosine_similarity(&a, &b).abs() < 1e-6);
}

#[test]
fn test_cosine_opposite_vectors_clamp_to_zero() {
    let a = vec![1.0, 0.0];
    let b = vec![-1.0, 0.0];
    assert_eq!(cosine_similarity(&a, &b), 0.0);
}

#[test]
fn test_cosine_mismatched_lengths_score_zero() {
    let a = vec![1.0, 0.0];
    let b = vec![1.0, 0.0, 0.0];
    assert_eq!(cosine_similarity(&a, &b), 0.0);
}

#[test]
fn test_validate_embedding_dim() {
    assert!(validate_embedding_dim(384, 384).is_ok());
    assert!(validate_embedding_dim(768, 384).is_err());
}

#[test]
fn test_registry_resolution_order() {
    let mut registry = EmbedderRegistry::new();
    registry.register("first", Arc::new(StubEmbedder::with_dimensions(16)));
    registry.register("second", Arc::new(StubEmbedder::with_dimensions(32)));

    // First registration is the default.
    assert_eq!(registry.get(None).unwrap().dimensions(), 16);
    assert_eq!(registry.get(Some("second")).unwrap().dimensions(), 32);

    assert!(registry.set_default("second"));
    assert_eq!(registry.get(None).unwrap().dimensions(), 32);
}

#[test]
fn test_registry_unknown_provider() {
    let registry = EmbedderRegistry::new();
    assert!(registry.get(None).is_err());
    assert!(registry.get(Some("nope")).is_err());
}
