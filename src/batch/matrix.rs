// src/batch/matrix.rs
//! Symmetric pairwise similarity matrix.

use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Row-major `n x n` matrix with a unit diagonal.
///
/// Cells never written stay at 0.0, so "not compared" and "compared and
/// dissimilar" look the same.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    cells: Vec<f64>,
}

impl SimilarityMatrix {
    /// Zero matrix with 1.0 on the diagonal.
    #[must_use]
    pub fn new(size: usize) -> Self {
        let mut cells = vec![0.0; size * size];
        for i in 0..size {
            cells[i * size + i] = 1.0;
        }
        Self { size, cells }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Value at `(i, j)`, or 0.0 outside the matrix.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i >= self.size || j >= self.size {
            return 0.0;
        }
        self.cells[i * self.size + j]
    }

    /// Writes `value` to both `(i, j)` and `(j, i)`. The diagonal and
    /// out-of-range cells are left alone.
    pub fn set_pair(&mut self, i: usize, j: usize, value: f64) {
        if i == j || i >= self.size || j >= self.size {
            return;
        }
        self.cells[i * self.size + j] = value;
        self.cells[j * self.size + i] = value;
    }

    /// Row `i`; empty if out of range.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        if i >= self.size {
            return &[];
        }
        &self.cells[i * self.size..(i + 1) * self.size]
    }

    /// Iterates rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.size).map(|i| self.row(i))
    }

    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| (i + 1..self.size).all(|j| self.get(i, j) == self.get(j, i)))
    }
}

impl Serialize for SimilarityMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.size))?;
        for row in self.rows() {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}
