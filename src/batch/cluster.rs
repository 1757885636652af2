// src/batch/cluster.rs
//! Greedy, seed-relative grouping over a similarity matrix.

use super::matrix::SimilarityMatrix;
use super::types::{Cluster, SourceFile};
use std::collections::HashSet;

/// Groups documents in a single pass.
///
/// Each not-yet-grouped seed `i`, in id order, collects every later `j` with
/// `matrix[i][j] >= threshold`. Collected documents stop being seeds but may
/// still join a later seed's group. Members are only checked against the
/// seed, not against each other. Singleton groups are dropped.
#[must_use]
pub fn cluster_matrix(
    matrix: &SimilarityMatrix,
    files: &[SourceFile],
    threshold: f64,
) -> Vec<Cluster> {
    let n = matrix.size();
    let mut grouped = HashSet::new();
    let mut clusters = Vec::new();

    for i in 0..n {
        if grouped.contains(&i) {
            continue;
        }

        let mut members = vec![i];
        for j in (i + 1)..n {
            if matrix.get(i, j) >= threshold {
                members.push(j);
                grouped.insert(j);
            }
        }

        if members.len() > 1 {
            clusters.push(Cluster {
                id: clusters.len() + 1,
                average_similarity: mean_pairwise(matrix, &members),
                names: members
                    .iter()
                    .map(|&m| files.get(m).map_or_else(|| format!("doc_{m}"), |f| f.name.clone()))
                    .collect(),
                members,
            });
        }
    }

    clusters
}

#[allow(clippy::cast_precision_loss)]
fn mean_pairwise(matrix: &SimilarityMatrix, members: &[usize]) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;
    for (a, &i) in members.iter().enumerate() {
        for &j in &members[a + 1..] {
            total += matrix.get(i, j);
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}
