// src/signature.rs
//! MinHash signatures over character shingles.
//!
//! Text is lower-cased and whitespace-collapsed, cut into overlapping
//! shingles of `shingle_size` characters, and reduced to one minimum per
//! hash function. Two signatures agree at position `k` with probability
//! equal to the Jaccard similarity of their shingle sets.

use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Default number of hash functions (signature length).
pub const DEFAULT_NUM_HASHES: usize = 128;

/// Default shingle width in characters.
pub const DEFAULT_SHINGLE_SIZE: usize = 3;

/// A fixed-length vector of per-function minimum hash values.
pub type Signature = Vec<u64>;

/// Computes MinHash signatures for documents.
///
/// The hash family is fixed by `num_hashes` alone, so two generators with
/// the same configuration always agree on every input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureGenerator {
    num_hashes: usize,
    shingle_size: usize,
}

impl Default for SignatureGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_NUM_HASHES, DEFAULT_SHINGLE_SIZE)
    }
}

impl SignatureGenerator {
    #[must_use]
    pub fn new(num_hashes: usize, shingle_size: usize) -> Self {
        Self {
            num_hashes,
            shingle_size,
        }
    }

    #[must_use]
    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }

    #[must_use]
    pub fn shingle_size(&self) -> usize {
        self.shingle_size
    }

    /// Computes the signature of `text`.
    ///
    /// Text shorter than one shingle yields `num_hashes` zeros.
    #[must_use]
    pub fn compute_signature(&self, text: &str) -> Signature {
        let shingles = shingles(text, self.shingle_size);
        if shingles.is_empty() {
            return vec![0; self.num_hashes];
        }

        let mut mins = vec![u64::MAX; self.num_hashes];
        for shingle in &shingles {
            // Prefix state is shared by every function for this shingle.
            let mut prefix = Sha256::new();
            prefix.update(shingle.as_bytes());

            for (index, slot) in mins.iter_mut().enumerate() {
                let h = finish_keyed(prefix.clone(), index);
                if h < *slot {
                    *slot = h;
                }
            }
        }
        mins
    }
}

/// Hash function `index` applied to `shingle`.
///
/// Digest of the shingle bytes followed by the little-endian function index,
/// truncated to its leading eight bytes.
#[must_use]
pub fn keyed_hash(shingle: &str, index: usize) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(shingle.as_bytes());
    finish_keyed(hasher, index)
}

#[allow(clippy::cast_possible_truncation)]
fn finish_keyed(mut hasher: Sha256, index: usize) -> u64 {
    hasher.update((index as u32).to_le_bytes());
    let digest = hasher.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(head)
}

/// Lower-cases, collapses whitespace runs to one space and trims.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds the set of overlapping `size`-character shingles of the
/// normalized text.
#[must_use]
pub fn shingles(text: &str, size: usize) -> HashSet<String> {
    let chars: Vec<char> = normalize(text).chars().collect();
    if size == 0 || chars.len() < size {
        return HashSet::new();
    }
    chars
        .windows(size)
        .map(|w| w.iter().collect::<String>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  Foo\t\tBAR \n baz  "), "foo bar baz");
    }

    #[test]
    fn test_shingles_slide_by_one() {
        let set = shingles("abcd", 3);
        assert_eq!(set.len(), 2);
        assert!(set.contains("abc"));
        assert!(set.contains("bcd"));
    }

    #[test]
    fn test_short_text_has_no_shingles() {
        assert!(shingles("ab", 3).is_empty());
        assert!(shingles("   a  ", 2).is_empty());
    }

    #[test]
    fn test_short_text_zero_signature() {
        let gen = SignatureGenerator::new(16, 3);
        assert_eq!(gen.compute_signature("hi"), vec![0; 16]);
    }

    #[test]
    fn test_signature_length_fixed() {
        let gen = SignatureGenerator::new(64, 3);
        assert_eq!((gen.num_hashes(), gen.shingle_size()), (64, 3));
        assert_eq!(gen.compute_signature("fn main() {}").len(), 64);
        assert_eq!(gen.compute_signature("").len(), 64);
    }

    #[test]
    fn test_signature_matches_keyed_hash_minimum() {
        let gen = SignatureGenerator::new(8, 3);
        let sig = gen.compute_signature("abcd");
        for (i, value) in sig.iter().enumerate() {
            let expected = keyed_hash("abc", i).min(keyed_hash("bcd", i));
            assert_eq!(*value, expected);
        }
    }

    #[test]
    fn test_case_and_spacing_do_not_matter() {
        let gen = SignatureGenerator::default();
        let a = gen.compute_signature("let  X = 1;\n");
        let b = gen.compute_signature("LET x = 1;");
        assert_eq!(a, b);
    }

    #[test]
    fn test_functions_are_independent() {
        assert_ne!(keyed_hash("abc", 0), keyed_hash("abc", 1));
    }
}
