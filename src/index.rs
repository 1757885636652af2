// src/index.rs
//! Candidate index: document storage plus MinHash/LSH lookup.
//!
//! One index is built per batch and dropped afterwards. It owns the
//! documents, their signatures and the band buckets, and answers
//! "what looks like document X" and "which pairs look alike" without
//! touching the precise comparator.

use crate::error::{CopycatError, Result};
use crate::estimator;
use crate::lsh::BandedIndex;
use crate::signature::{Signature, SignatureGenerator, DEFAULT_NUM_HASHES, DEFAULT_SHINGLE_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Sequential document identifier, starting at 0 per index.
pub type DocId = usize;

/// Sizing of the signature and band layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default = "default_num_hashes")]
    pub num_hashes: usize,
    #[serde(default = "default_num_bands")]
    pub num_bands: usize,
    #[serde(default = "default_shingle_size")]
    pub shingle_size: usize,
    /// Minimum estimated similarity for a candidate pair.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            num_hashes: default_num_hashes(),
            num_bands: default_num_bands(),
            shingle_size: default_shingle_size(),
            threshold: default_threshold(),
        }
    }
}

const fn default_num_hashes() -> usize { DEFAULT_NUM_HASHES }
const fn default_num_bands() -> usize { 16 }
const fn default_shingle_size() -> usize { DEFAULT_SHINGLE_SIZE }
const fn default_threshold() -> f64 { 0.5 }

impl IndexConfig {
    /// Rows per band implied by the hash and band counts.
    #[must_use]
    pub fn rows_per_band(&self) -> usize {
        self.num_hashes.checked_div(self.num_bands).unwrap_or(0)
    }

    /// Checks that the band layout tiles the signature exactly.
    ///
    /// # Errors
    /// Returns a configuration error describing the first violated rule.
    pub fn validate(&self) -> Result<()> {
        if self.num_hashes == 0 {
            return Err(invalid("num_hashes must be positive"));
        }
        if self.num_bands == 0 {
            return Err(invalid("num_bands must be positive"));
        }
        if self.num_hashes % self.num_bands != 0 {
            return Err(CopycatError::Configuration(format!(
                "num_hashes ({}) is not a multiple of num_bands ({})",
                self.num_hashes, self.num_bands
            )));
        }
        if self.shingle_size == 0 {
            return Err(invalid("shingle_size must be positive"));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(CopycatError::Configuration(format!(
                "threshold {} is outside [0, 1]",
                self.threshold
            )));
        }
        Ok(())
    }

    /// Similarity at which a pair becomes a candidate with probability
    /// about one half: `(1/b)^(1/r)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn implied_threshold(&self) -> f64 {
        let rows = self.rows_per_band();
        if self.num_bands == 0 || rows == 0 {
            return 1.0;
        }
        (1.0 / self.num_bands as f64).powf(1.0 / rows as f64)
    }
}

fn invalid(msg: &str) -> CopycatError {
    CopycatError::Configuration(msg.to_string())
}

/// A stored document. Immutable once added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub id: DocId,
    pub name: String,
    pub content: String,
}

/// Two documents flagged as likely similar, `first < second`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandidatePair {
    pub first: DocId,
    pub second: DocId,
    pub estimate: f64,
}

/// MinHash + LSH index over a batch of documents.
#[derive(Debug, Clone)]
pub struct CandidateIndex {
    config: IndexConfig,
    generator: SignatureGenerator,
    bands: BandedIndex,
    documents: Vec<Document>,
    signatures: Vec<Signature>,
}

impl CandidateIndex {
    /// Creates an empty index.
    ///
    /// # Errors
    /// Returns a configuration error if the layout is inconsistent.
    pub fn new(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        let generator = SignatureGenerator::new(config.num_hashes, config.shingle_size);
        let bands = BandedIndex::new(config.num_bands, config.rows_per_band())?;
        tracing::debug!(
            num_hashes = generator.num_hashes(),
            shingle_size = generator.shingle_size(),
            num_bands = bands.num_bands(),
            rows_per_band = bands.rows_per_band(),
            "candidate index created"
        );
        Ok(Self {
            config,
            generator,
            bands,
            documents: Vec::new(),
            signatures: Vec::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Signs and indexes `content`, returning its id. Unnamed documents are
    /// called `doc_<id>`.
    ///
    /// # Errors
    /// Propagates band layout errors; unreachable for a validated config.
    pub fn add_document(&mut self, content: &str, name: Option<&str>) -> Result<DocId> {
        let id = self.documents.len();
        let signature = self.generator.compute_signature(content);
        self.bands.add_signature(id, &signature)?;

        self.signatures.push(signature);
        self.documents.push(Document {
            id,
            name: name.map_or_else(|| format!("doc_{id}"), str::to_string),
            content: content.to_string(),
        });
        Ok(id)
    }

    /// Looks up a stored document.
    #[must_use]
    pub fn document(&self, id: DocId) -> Option<&Document> {
        self.documents.get(id)
    }

    /// Stored signature of a document.
    #[must_use]
    pub fn signature(&self, id: DocId) -> Option<&Signature> {
        self.signatures.get(id)
    }

    /// Documents whose estimated similarity to `id` is at least
    /// `threshold`, most similar first. Never includes `id` itself.
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown id.
    pub fn find_similar(&self, id: DocId, threshold: f64) -> Result<Vec<(DocId, f64)>> {
        let query = self.signatures.get(id).ok_or(CopycatError::NotFound(id))?;

        let mut results = Vec::new();
        for candidate in self.bands.query(query)? {
            if candidate == id {
                continue;
            }
            let Some(other) = self.signatures.get(candidate) else {
                continue;
            };
            let similarity = estimator::estimate(query, other)?;
            if similarity >= threshold {
                results.push((candidate, similarity));
            }
        }

        results.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(results)
    }

    /// Every unordered pair at or above `min_similarity`, most similar
    /// first, each reported once as `(lower id, higher id)`.
    ///
    /// Documents shorter than one shingle all share the zero signature, so
    /// any two of them pair up with an estimate of 1.0.
    ///
    /// # Errors
    /// Propagates estimator errors; unreachable for a validated config.
    pub fn find_all_similar_pairs(&self, min_similarity: f64) -> Result<Vec<CandidatePair>> {
        let mut seen = HashSet::new();
        let mut pairs = Vec::new();

        for doc in &self.documents {
            for (other, estimate) in self.find_similar(doc.id, min_similarity)? {
                let key = (doc.id.min(other), doc.id.max(other));
                if seen.insert(key) {
                    pairs.push(CandidatePair {
                        first: key.0,
                        second: key.1,
                        estimate,
                    });
                }
            }
        }

        pairs.sort_by(|a, b| b.estimate.total_cmp(&a.estimate));
        tracing::debug!(
            documents = self.documents.len(),
            pairs = pairs.len(),
            min_similarity,
            "candidate pairs collected"
        );
        Ok(pairs)
    }

    /// Drops all documents and buckets; ids restart at 0.
    pub fn clear(&mut self) {
        self.bands.clear();
        self.documents.clear();
        self.signatures.clear();
    }
}

/// One-shot MinHash estimate between two texts.
///
/// # Errors
/// Never fails for equal-length signatures; kept fallible for the estimator
/// contract.
pub fn quick_similarity(a: &str, b: &str, num_hashes: usize) -> Result<f64> {
    let generator = SignatureGenerator::new(num_hashes, DEFAULT_SHINGLE_SIZE);
    estimator::estimate(
        &generator.compute_signature(a),
        &generator.compute_signature(b),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUM: &str = "def calculate_total(numbers):
    total = 0
    for number in numbers:
        total += number
    return total
";

    const SORT: &str = "def bubble_sort(arr):
    n = len(arr)
    for i in range(n):
        for j in range(0, n - i - 1):
            if arr[j] > arr[j + 1]:
                arr[j], arr[j + 1] = arr[j + 1], arr[j]
    return arr
";

    #[test]
    fn test_config_rejects_uneven_bands() {
        let config = IndexConfig {
            num_hashes: 100,
            num_bands: 16,
            ..IndexConfig::default()
        };
        assert!(matches!(
            CandidateIndex::new(config),
            Err(CopycatError::Configuration(_))
        ));
    }

    #[test]
    fn test_config_rejects_zero_bands_and_bad_threshold() {
        let zero = IndexConfig {
            num_bands: 0,
            ..IndexConfig::default()
        };
        assert!(zero.validate().is_err());

        let high = IndexConfig {
            threshold: 1.5,
            ..IndexConfig::default()
        };
        assert!(high.validate().is_err());
    }

    #[test]
    fn test_implied_threshold_default_layout() {
        let t = IndexConfig::default().implied_threshold();
        // (1/16)^(1/8)
        assert!((t - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9, "got {t}");
    }

    #[test]
    fn test_ids_are_sequential_and_names_default() -> Result<()> {
        let mut index = CandidateIndex::new(IndexConfig::default())?;
        assert_eq!(index.add_document(SUM, Some("a.py"))?, 0);
        assert_eq!(index.add_document(SORT, None)?, 1);
        assert_eq!(index.document(1).map(|d| d.name.as_str()), Some("doc_1"));
        assert_eq!(index.len(), 2);
        assert!(index.document(2).is_none());
        Ok(())
    }

    #[test]
    fn test_find_similar_unknown_id() -> Result<()> {
        let index = CandidateIndex::new(IndexConfig::default())?;
        assert_eq!(index.find_similar(3, 0.5), Err(CopycatError::NotFound(3)));
        Ok(())
    }

    #[test]
    fn test_find_similar_excludes_self() -> Result<()> {
        let mut index = CandidateIndex::new(IndexConfig::default())?;
        let a = index.add_document(SUM, None)?;
        let b = index.add_document(SUM, None)?;
        index.add_document(SORT, None)?;

        let hits = index.find_similar(a, 0.0)?;
        assert!(hits.iter().all(|(id, _)| *id != a));
        assert_eq!(hits.first().map(|h| h.0), Some(b));
        Ok(())
    }

    #[test]
    fn test_tiny_documents_pair_at_full_estimate() -> Result<()> {
        let mut index = CandidateIndex::new(IndexConfig::default())?;
        index.add_document("", None)?;
        index.add_document("x", None)?;
        index.add_document(SORT, None)?;

        let pairs = index.find_all_similar_pairs(0.5)?;
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].first, pairs[0].second), (0, 1));
        assert!((pairs[0].estimate - 1.0).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn test_documents_keep_insertion_order() -> Result<()> {
        let config = IndexConfig {
            threshold: 0.8,
            ..IndexConfig::default()
        };
        let mut index = CandidateIndex::new(config)?;
        index.add_document(SUM, Some("sum.py"))?;
        index.add_document(SORT, None)?;

        assert_eq!(index.config(), &config);
        let names: Vec<&str> = index.documents().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["sum.py", "doc_1"]);
        Ok(())
    }

    #[test]
    fn test_clear_resets_ids() -> Result<()> {
        let mut index = CandidateIndex::new(IndexConfig::default())?;
        index.add_document(SUM, None)?;
        index.add_document(SUM, None)?;
        index.clear();

        assert!(index.is_empty());
        assert!(index.find_all_similar_pairs(0.0)?.is_empty());
        assert_eq!(index.add_document(SORT, None)?, 0);
        Ok(())
    }

    #[test]
    fn test_quick_similarity_identical() -> Result<()> {
        let s = quick_similarity(SUM, SUM, 64)?;
        assert!((s - 1.0).abs() < f64::EPSILON);
        Ok(())
    }
}
