// src/batch/types.rs
//! Result types for batch comparison runs.

use super::matrix::SimilarityMatrix;
use serde::{Deserialize, Serialize};

/// A named source text submitted to a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
}

impl SourceFile {
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }
}

/// How pairs are chosen for precise comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Every unordered pair.
    #[default]
    Exhaustive,
    /// Only MinHash/LSH candidate pairs.
    Indexed,
}

impl Strategy {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Exhaustive => "exhaustive",
            Self::Indexed => "indexed",
        }
    }
}

/// One precise comparison, successful or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub first: usize,
    pub second: usize,
    pub first_name: String,
    pub second_name: String,
    /// Comparator score; `None` when the comparator failed.
    pub similarity: Option<f64>,
    /// MinHash estimate that put this pair on the shortlist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minhash_estimate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Comparison {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.similarity.is_none()
    }
}

/// The highest-scoring pair of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairSummary {
    pub first: usize,
    pub second: usize,
    pub first_name: String,
    pub second_name: String,
    pub similarity: f64,
}

/// Aggregates over successful comparisons only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub average_similarity: f64,
    pub min_similarity: f64,
    pub max_similarity: f64,
    pub most_similar_pair: Option<PairSummary>,
}

/// Average similarity of one file to the rest of the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileRanking {
    pub index: usize,
    pub name: String,
    pub average_similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub name: String,
    pub lines: usize,
}

/// Work avoided by the indexed strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Efficiency {
    pub minhash_threshold: f64,
    /// Similarity the band layout targets, see [`IndexConfig::implied_threshold`].
    ///
    /// [`IndexConfig::implied_threshold`]: crate::index::IndexConfig::implied_threshold
    pub implied_threshold: f64,
    pub candidate_pairs: usize,
    pub total_possible_pairs: usize,
    pub pairs_skipped: usize,
    /// `total_possible_pairs / max(candidate_pairs, 1)`.
    pub speedup: f64,
    /// Share of pairs skipped, in percent.
    pub efficiency_percentage: f64,
}

/// Complete output of one batch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub strategy: Strategy,
    pub language: String,
    pub file_count: usize,
    pub comparison_count: usize,
    pub failed_count: usize,
    pub matrix: SimilarityMatrix,
    pub comparisons: Vec<Comparison>,
    pub statistics: Statistics,
    pub file_rankings: Vec<FileRanking>,
    pub files: Vec<FileSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<Efficiency>,
}

/// A seed document and the later documents that cleared the threshold
/// against it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    /// 1-based, in discovery order.
    pub id: usize,
    pub members: Vec<usize>,
    pub names: Vec<String>,
    pub average_similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterReport {
    pub threshold: f64,
    pub clusters: Vec<Cluster>,
    pub comparison: BatchReport,
}
