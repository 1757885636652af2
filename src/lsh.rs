// src/lsh.rs
//! Banded locality-sensitive hashing over MinHash signatures.
//!
//! A signature of `num_bands * rows_per_band` values is cut into contiguous
//! bands. Each band's values hash to one bucket key, and two documents become
//! candidates when they share a bucket in at least one band. With similarity
//! `s` the collision probability is `1 - (1 - s^r)^b`.

use crate::error::{CopycatError, Result};
use crate::index::DocId;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeSet, HashMap};
use std::hash::{Hash, Hasher};

/// Bucket map for one band layout.
#[derive(Debug, Clone)]
pub struct BandedIndex {
    num_bands: usize,
    rows_per_band: usize,
    /// One `bucket key -> doc ids` map per band.
    buckets: Vec<HashMap<u64, Vec<DocId>>>,
}

impl BandedIndex {
    /// Creates an empty index.
    ///
    /// # Errors
    /// Returns a configuration error if either dimension is zero.
    pub fn new(num_bands: usize, rows_per_band: usize) -> Result<Self> {
        if num_bands == 0 || rows_per_band == 0 {
            return Err(CopycatError::Configuration(format!(
                "band layout {num_bands}x{rows_per_band} must have at least one band and one row"
            )));
        }
        Ok(Self {
            num_bands,
            rows_per_band,
            buckets: vec![HashMap::new(); num_bands],
        })
    }

    #[must_use]
    pub fn num_bands(&self) -> usize {
        self.num_bands
    }

    #[must_use]
    pub fn rows_per_band(&self) -> usize {
        self.rows_per_band
    }

    /// Signature length this layout accepts.
    #[must_use]
    pub fn signature_len(&self) -> usize {
        self.num_bands * self.rows_per_band
    }

    /// Files `doc_id` under the bucket of every band of `signature`.
    ///
    /// # Errors
    /// Returns a configuration error if the signature length does not match
    /// the band layout.
    pub fn add_signature(&mut self, doc_id: DocId, signature: &[u64]) -> Result<()> {
        let keys = self.band_keys(signature)?;
        for (band, key) in self.buckets.iter_mut().zip(keys) {
            band.entry(key).or_default().push(doc_id);
        }
        Ok(())
    }

    /// Returns every document sharing at least one band bucket with
    /// `signature`.
    ///
    /// # Errors
    /// Returns a configuration error if the signature length does not match
    /// the band layout.
    pub fn query(&self, signature: &[u64]) -> Result<BTreeSet<DocId>> {
        let keys = self.band_keys(signature)?;
        let mut candidates = BTreeSet::new();
        for (band, key) in self.buckets.iter().zip(keys) {
            if let Some(ids) = band.get(&key) {
                candidates.extend(ids.iter().copied());
            }
        }
        Ok(candidates)
    }

    /// Drops every bucket, keeping the layout.
    pub fn clear(&mut self) {
        for band in &mut self.buckets {
            band.clear();
        }
    }

    /// Number of non-empty buckets across all bands.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.iter().map(HashMap::len).sum()
    }

    fn band_keys(&self, signature: &[u64]) -> Result<Vec<u64>> {
        if signature.len() != self.signature_len() {
            return Err(CopycatError::Configuration(format!(
                "signature has {} values but layout {}x{} needs {}",
                signature.len(),
                self.num_bands,
                self.rows_per_band,
                self.signature_len()
            )));
        }
        Ok(signature
            .chunks_exact(self.rows_per_band)
            .map(hash_band)
            .collect())
    }
}

fn hash_band(values: &[u64]) -> u64 {
    let mut hasher = DefaultHasher::new();
    values.hash(&mut hasher);
    hasher.finish()
}
