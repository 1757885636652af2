// src/batch/mod.rs
//! Batch comparison of many source files.
//!
//! Two strategies share one output shape:
//! - **Exhaustive**: the precise comparator scores all `n(n-1)/2` pairs.
//! - **Indexed**: a [`CandidateIndex`] shortlists pairs by MinHash estimate
//!   and only those reach the comparator. Skipped pairs stay at 0.0.
//!
//! A failing or panicking comparator costs one pair, never the batch.

pub mod cluster;
pub mod matrix;
pub mod stats;
pub mod types;

pub use cluster::cluster_matrix;
pub use matrix::SimilarityMatrix;
pub use types::{
    BatchReport, Cluster, ClusterReport, Comparison, Efficiency, FileRanking, FileSummary,
    PairSummary, SourceFile, Statistics, Strategy,
};

use crate::compare::{Comparator, Verdict};
use crate::error::Result;
use crate::index::{CandidateIndex, IndexConfig};
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};

/// Knobs shared by every run of one comparator.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Language passed to the comparator.
    pub language: String,
    /// Score pairs on the rayon pool.
    pub parallel: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            language: "text".to_string(),
            parallel: true,
        }
    }
}

/// A pair queued for precise comparison.
#[derive(Debug, Clone, Copy)]
struct PairJob {
    first: usize,
    second: usize,
    estimate: Option<f64>,
}

/// Runs a [`Comparator`] over batches of files.
pub struct BatchComparator<C> {
    comparator: C,
    options: BatchOptions,
}

impl<C: Comparator> BatchComparator<C> {
    #[must_use]
    pub fn new(comparator: C, options: BatchOptions) -> Self {
        Self {
            comparator,
            options,
        }
    }

    #[must_use]
    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Dispatches to the chosen strategy. `index` only matters for
    /// [`Strategy::Indexed`].
    ///
    /// # Errors
    /// Returns a configuration error if `index` is inconsistent.
    pub fn run(
        &self,
        files: &[SourceFile],
        strategy: Strategy,
        index: &IndexConfig,
    ) -> Result<BatchReport> {
        match strategy {
            Strategy::Exhaustive => Ok(self.compare_all_pairs(files)),
            Strategy::Indexed => self.compare_candidates(files, index),
        }
    }

    /// Scores every unordered pair.
    #[must_use]
    pub fn compare_all_pairs(&self, files: &[SourceFile]) -> BatchReport {
        let n = files.len();
        let jobs: Vec<PairJob> = (0..n)
            .flat_map(|i| {
                ((i + 1)..n).map(move |j| PairJob {
                    first: i,
                    second: j,
                    estimate: None,
                })
            })
            .collect();

        tracing::info!(files = n, pairs = jobs.len(), "exhaustive batch started");
        let comparisons = self.score_jobs(files, &jobs);
        self.assemble(files, Strategy::Exhaustive, comparisons, None)
    }

    /// Scores only the pairs the MinHash index estimates at or above
    /// `index.threshold`.
    ///
    /// # Errors
    /// Returns a configuration error if `index` is inconsistent.
    #[allow(clippy::cast_precision_loss)]
    pub fn compare_candidates(
        &self,
        files: &[SourceFile],
        index: &IndexConfig,
    ) -> Result<BatchReport> {
        let n = files.len();
        let mut candidates = CandidateIndex::new(*index)?;
        for file in files {
            candidates.add_document(&file.content, Some(&file.name))?;
        }

        // Ids are assigned in insertion order, so they double as file indices.
        let jobs: Vec<PairJob> = candidates
            .find_all_similar_pairs(index.threshold)?
            .into_iter()
            .map(|p| PairJob {
                first: p.first,
                second: p.second,
                estimate: Some(p.estimate),
            })
            .collect();

        let total_possible_pairs = n * n.saturating_sub(1) / 2;
        let pairs_skipped = total_possible_pairs - jobs.len();
        let efficiency = Efficiency {
            minhash_threshold: index.threshold,
            implied_threshold: index.implied_threshold(),
            candidate_pairs: jobs.len(),
            total_possible_pairs,
            pairs_skipped,
            speedup: total_possible_pairs as f64 / jobs.len().max(1) as f64,
            efficiency_percentage: if total_possible_pairs == 0 {
                0.0
            } else {
                pairs_skipped as f64 / total_possible_pairs as f64 * 100.0
            },
        };

        tracing::info!(
            files = n,
            candidates = jobs.len(),
            skipped = pairs_skipped,
            "indexed batch started"
        );
        let comparisons = self.score_jobs(files, &jobs);
        Ok(self.assemble(files, Strategy::Indexed, comparisons, Some(efficiency)))
    }

    /// Runs an exhaustive batch and groups its matrix at `threshold`.
    #[must_use]
    pub fn find_clusters(&self, files: &[SourceFile], threshold: f64) -> ClusterReport {
        let comparison = self.compare_all_pairs(files);
        let clusters = cluster_matrix(&comparison.matrix, files, threshold);
        ClusterReport {
            threshold,
            clusters,
            comparison,
        }
    }

    fn score_jobs(&self, files: &[SourceFile], jobs: &[PairJob]) -> Vec<Comparison> {
        if self.options.parallel {
            jobs.par_iter().map(|job| self.score_pair(files, *job)).collect()
        } else {
            jobs.iter().map(|job| self.score_pair(files, *job)).collect()
        }
    }

    fn score_pair(&self, files: &[SourceFile], job: PairJob) -> Comparison {
        let (a, b) = (&files[job.first], &files[job.second]);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.comparator
                .compare(&a.content, &b.content, &self.options.language)
        }));

        let verdict = match outcome {
            Ok(Ok(v)) if (0.0..=1.0).contains(&v.score) => Ok(v),
            Ok(Ok(v)) => Err(format!("score {} outside [0, 1]", v.score)),
            Ok(Err(e)) => Err(format!("{e:#}")),
            Err(payload) => Err(panic_message(payload.as_ref())),
        };

        let (similarity, metadata, error) = match verdict {
            Ok(Verdict { score, metadata }) => (Some(score), metadata, None),
            Err(msg) => {
                tracing::warn!(
                    first = %a.name,
                    second = %b.name,
                    error = %msg,
                    "comparison failed"
                );
                (None, None, Some(msg))
            }
        };

        Comparison {
            first: job.first,
            second: job.second,
            first_name: a.name.clone(),
            second_name: b.name.clone(),
            similarity,
            minhash_estimate: job.estimate,
            metadata,
            error,
        }
    }

    fn assemble(
        &self,
        files: &[SourceFile],
        strategy: Strategy,
        comparisons: Vec<Comparison>,
        efficiency: Option<Efficiency>,
    ) -> BatchReport {
        let mut matrix = SimilarityMatrix::new(files.len());
        for c in &comparisons {
            matrix.set_pair(c.first, c.second, c.similarity.unwrap_or(0.0));
        }

        let statistics = stats::summarize(&comparisons);
        let file_rankings = stats::rank_files(&matrix, files, strategy);
        let failed_count = comparisons.iter().filter(|c| c.is_failed()).count();

        tracing::debug!(
            strategy = strategy.label(),
            compared = comparisons.len(),
            failed = failed_count,
            "batch finished"
        );

        BatchReport {
            strategy,
            language: self.options.language.clone(),
            file_count: files.len(),
            comparison_count: comparisons.len(),
            failed_count,
            matrix,
            comparisons,
            statistics,
            file_rankings,
            files: files
                .iter()
                .map(|f| FileSummary {
                    name: f.name.clone(),
                    lines: f.line_count(),
                })
                .collect(),
            efficiency,
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("comparator panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("comparator panicked: {s}")
    } else {
        "comparator panicked".to_string()
    }
}
