// src/batch/stats.rs
//! Summary statistics and per-file rankings.

use super::matrix::SimilarityMatrix;
use super::types::{Comparison, FileRanking, PairSummary, SourceFile, Statistics, Strategy};

/// Average, min and max over successful comparisons; the most similar pair
/// is the first one reaching the maximum.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(comparisons: &[Comparison]) -> Statistics {
    let mut best: Option<(&Comparison, f64)> = None;
    let mut total = 0.0;
    let mut count = 0usize;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for comparison in comparisons {
        let Some(score) = comparison.similarity else {
            continue;
        };
        total += score;
        count += 1;
        min = min.min(score);
        max = max.max(score);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((comparison, score));
        }
    }

    if count == 0 {
        return Statistics::default();
    }

    Statistics {
        average_similarity: total / count as f64,
        min_similarity: min,
        max_similarity: max,
        most_similar_pair: best.map(|(c, similarity)| PairSummary {
            first: c.first,
            second: c.second,
            first_name: c.first_name.clone(),
            second_name: c.second_name.clone(),
            similarity,
        }),
    }
}

/// Ranks files by the mean of their matrix row, diagonal excluded.
///
/// Exhaustive runs divide by all `n - 1` neighbours. Indexed runs average
/// only non-zero cells, since unwritten cells stand for skipped pairs; a
/// genuine 0.0 score is dropped from the mean as well.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rank_files(
    matrix: &SimilarityMatrix,
    files: &[SourceFile],
    strategy: Strategy,
) -> Vec<FileRanking> {
    let n = matrix.size();
    let mut rankings: Vec<FileRanking> = files
        .iter()
        .enumerate()
        .map(|(i, file)| {
            let neighbours = matrix
                .row(i)
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, v)| *v);

            let average_similarity = match strategy {
                Strategy::Exhaustive if n > 1 => neighbours.sum::<f64>() / (n - 1) as f64,
                Strategy::Exhaustive => 0.0,
                Strategy::Indexed => {
                    let compared: Vec<f64> = neighbours.filter(|v| *v > 0.0).collect();
                    if compared.is_empty() {
                        0.0
                    } else {
                        compared.iter().sum::<f64>() / compared.len() as f64
                    }
                }
            };

            FileRanking {
                index: i,
                name: file.name.clone(),
                average_similarity,
            }
        })
        .collect();

    rankings.sort_by(|a, b| b.average_similarity.total_cmp(&a.average_similarity));
    rankings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(first: usize, second: usize, similarity: Option<f64>) -> Comparison {
        Comparison {
            first,
            second,
            first_name: format!("f{first}"),
            second_name: format!("f{second}"),
            similarity,
            minhash_estimate: None,
            metadata: None,
            error: similarity.is_none().then(|| "boom".to_string()),
        }
    }

    fn files(n: usize) -> Vec<SourceFile> {
        (0..n).map(|i| SourceFile::new(format!("f{i}"), "")).collect()
    }

    #[test]
    fn test_empty_statistics() {
        let stats = summarize(&[]);
        assert_eq!(stats, Statistics::default());
        assert!(stats.most_similar_pair.is_none());
    }

    #[test]
    fn test_failed_pairs_are_excluded() {
        let stats = summarize(&[
            record(0, 1, Some(0.2)),
            record(0, 2, None),
            record(1, 2, Some(0.6)),
        ]);
        assert!((stats.average_similarity - 0.4).abs() < 1e-12);
        assert!((stats.min_similarity - 0.2).abs() < f64::EPSILON);
        assert!((stats.max_similarity - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_max_tie_keeps_first() {
        let stats = summarize(&[record(0, 1, Some(0.9)), record(1, 2, Some(0.9))]);
        let best = stats.most_similar_pair.map(|p| (p.first, p.second));
        assert_eq!(best, Some((0, 1)));
    }

    #[test]
    fn test_exhaustive_ranking_uses_all_neighbours() {
        let mut m = SimilarityMatrix::new(3);
        m.set_pair(0, 1, 0.8);
        let ranks = rank_files(&m, &files(3), Strategy::Exhaustive);
        assert_eq!(ranks[0].index, 0);
        assert!((ranks[0].average_similarity - 0.4).abs() < 1e-12);
        assert!(ranks[2].average_similarity.abs() < f64::EPSILON);
    }

    #[test]
    fn test_indexed_ranking_skips_zero_cells() {
        let mut m = SimilarityMatrix::new(3);
        m.set_pair(0, 1, 0.8);
        let ranks = rank_files(&m, &files(3), Strategy::Indexed);
        assert!((ranks[0].average_similarity - 0.8).abs() < 1e-12);
        assert!((ranks[1].average_similarity - 0.8).abs() < 1e-12);
        assert!(ranks[2].average_similarity.abs() < f64::EPSILON);
    }

    #[test]
    fn test_indexed_ranking_treats_real_zero_as_skipped() {
        let mut m = SimilarityMatrix::new(3);
        m.set_pair(0, 1, 0.8);
        m.set_pair(0, 2, 0.0);
        let ranks = rank_files(&m, &files(3), Strategy::Indexed);
        let first = ranks.iter().find(|r| r.index == 0).map(|r| r.average_similarity);
        assert_eq!(first, Some(0.8));
    }

    #[test]
    fn test_single_file_ranks_zero() {
        let m = SimilarityMatrix::new(1);
        let ranks = rank_files(&m, &files(1), Strategy::Exhaustive);
        assert_eq!(ranks.len(), 1);
        assert!(ranks[0].average_similarity.abs() < f64::EPSILON);
    }
}
