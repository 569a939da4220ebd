//! Compare two snippets and deduplicate a small batch.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    use kindred::{EmbedderRegistry, SimilarityEngine, SimilarityOptions};

    let engine = SimilarityEngine::builder()
        .embedders(EmbedderRegistry::with_stub())
        .build()?;

    let report = engine
        .calculate_similarity(
            "function add(a,b){return a+b;}",
            "function add(x,y){return x+y;}",
            &SimilarityOptions {
                language: Some("javascript".to_owned()),
                ..Default::default()
            },
        )
        .await?;
    println!(
        "similarity={:.3} is_similar={} strategies={}",
        report.similarity, report.is_similar, report.execution.executed_strategies
    );

    let items = vec![
        "first draft".to_owned(),
        "first draft".to_owned(),
        "something else".to_owned(),
    ];
    let kept = engine
        .filter_similar_items(&items, 0.9, &SimilarityOptions::default())
        .await?;
    println!("kept {} of {} items", kept.len(), items.len());

    Ok(())
}
