// src/compare.rs
//! The precise pairwise comparator seam.
//!
//! Batch runs call a [`Comparator`] once per surfaced pair. Anything that
//! parses code, walks syntax trees or calls out to another tool plugs in
//! here. [`SequenceComparator`] is the built-in token-level fallback.

use anyhow::Result;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Result of one precise comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    /// Similarity in `[0, 1]`.
    pub score: f64,
    /// Comparator-specific detail, passed through to reports untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Verdict {
    #[must_use]
    pub fn new(score: f64) -> Self {
        Self {
            score,
            metadata: None,
        }
    }
}

/// Scores a pair of source texts written in `language`.
pub trait Comparator: Send + Sync {
    /// # Errors
    /// Returns an error when the pair cannot be scored (parse failure,
    /// unsupported input). Batch runs record it against that pair only.
    fn compare(&self, a: &str, b: &str, language: &str) -> Result<Verdict>;
}

impl<F> Comparator for F
where
    F: Fn(&str, &str, &str) -> Result<Verdict> + Send + Sync,
{
    fn compare(&self, a: &str, b: &str, language: &str) -> Result<Verdict> {
        self(a, b, language)
    }
}

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z_][A-Za-z0-9_]*|\d+|\S").unwrap_or_else(|_| panic!("Invalid Regex"))
});

/// Token-sequence ratio `2 * LCS / (|a| + |b|)`.
///
/// Language-agnostic: identifiers, numbers and single punctuation marks are
/// the tokens, so formatting differences vanish but renames do not.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceComparator;

impl Comparator for SequenceComparator {
    #[allow(clippy::cast_precision_loss)]
    fn compare(&self, a: &str, b: &str, _language: &str) -> Result<Verdict> {
        let left = tokenize(a);
        let right = tokenize(b);
        let total = left.len() + right.len();
        if total == 0 {
            return Ok(Verdict::new(1.0));
        }

        let matched = lcs_len(&left, &right);
        Ok(Verdict {
            score: (2 * matched) as f64 / total as f64,
            metadata: Some(serde_json::json!({
                "tokens_a": left.len(),
                "tokens_b": right.len(),
                "matched_tokens": matched,
            })),
        })
    }
}

fn tokenize(text: &str) -> Vec<&str> {
    TOKEN_RE.find_iter(text).map(|m| m.as_str()).collect()
}

fn lcs_len(a: &[&str], b: &[&str]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            cur[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_splits_punctuation() {
        assert_eq!(tokenize("x+=y_1;"), vec!["x", "+", "=", "y_1", ";"]);
    }

    #[test]
    fn test_lcs() {
        assert_eq!(lcs_len(&["a", "b", "c", "d"], &["a", "c", "d"]), 3);
        assert_eq!(lcs_len(&[], &["a"]), 0);
    }

    #[test]
    fn test_identical_scores_one() -> Result<()> {
        let v = SequenceComparator.compare("fn a() { 1 }", "fn a() {\n 1\n}", "rust")?;
        assert!((v.score - 1.0).abs() < f64::EPSILON);
        assert!(v.metadata.is_some());
        Ok(())
    }

    #[test]
    fn test_empty_inputs() -> Result<()> {
        assert!((SequenceComparator.compare("", "  ", "text")?.score - 1.0).abs() < f64::EPSILON);
        assert!(SequenceComparator.compare("x", "", "text")?.score.abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn test_closure_is_comparator() -> Result<()> {
        let fixed = |_: &str, _: &str, _: &str| -> Result<Verdict> { Ok(Verdict::new(0.25)) };
        assert!((fixed.compare("a", "b", "c")?.score - 0.25).abs() < f64::EPSILON);
        Ok(())
    }
}
