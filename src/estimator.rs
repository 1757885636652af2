// src/estimator.rs
//! Jaccard estimation from MinHash signatures.

use crate::error::{CopycatError, Result};

/// Fraction of positions where the two signatures agree.
///
/// Standard error shrinks as `1/sqrt(len)`. Two empty signatures are
/// identical and compare as 1.0.
///
/// # Errors
/// Returns `SizeMismatch` if the signatures differ in length.
#[allow(clippy::cast_precision_loss)]
pub fn estimate(a: &[u64], b: &[u64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(CopycatError::SizeMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.is_empty() {
        return Ok(1.0);
    }

    let matches = a.iter().zip(b).filter(|(x, y)| x == y).count();
    Ok(matches as f64 / a.len() as f64)
}
