use serde::{Deserialize, Serialize};

use crate::analysis::ComplexityLevel;

/// One above-threshold pair from a batch matrix (upper triangle only).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityPair {
    pub index_a: usize,
    pub index_b: usize,
    pub similarity: f32,
}

/// Output of one batch calculation.
///
/// `matrix` is a full symmetric `n x n` similarity matrix with a unit
/// diagonal. Oversized generic batches are scored as independent dense
/// chunks; pairs spanning two chunks stay at 0 in the matrix and never appear
/// in `pairs`, a documented approximation downstream dedup relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub matrix: Vec<Vec<f32>>,
    pub pairs: Vec<SimilarityPair>,
    pub execution_time_ms: f64,
    /// Units of work served from cached state (embedding reuse, etc.).
    pub cache_hits: usize,
}

impl BatchResult {
    /// Allocates an `n x n` zero matrix with a unit diagonal.
    pub fn identity_matrix(n: usize) -> Vec<Vec<f32>> {
        let mut matrix = vec![vec![0.0; n]; n];
        for (i, row) in matrix.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        matrix
    }

    /// Collects the above-threshold upper-triangle pairs of `matrix`.
    pub fn pairs_over_threshold(matrix: &[Vec<f32>], threshold: f32) -> Vec<SimilarityPair> {
        let mut pairs = Vec::new();
        for i in 0..matrix.len() {
            for j in (i + 1)..matrix.len() {
                let similarity = matrix[i][j];
                if similarity >= threshold {
                    pairs.push(SimilarityPair {
                        index_a: i,
                        index_b: j,
                        similarity,
                    });
                }
            }
        }
        pairs
    }
}

/// Shape summary the adaptive dispatcher derives from a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchProfile {
    pub count: usize,
    pub avg_length: usize,
    pub max_length: usize,
    pub min_length: usize,
    pub complexity: ComplexityLevel,
    pub has_code_patterns: bool,
    pub high_special_density: bool,
}
