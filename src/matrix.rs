//! Distance matrix containers
//!
//! Two result shapes: a dense n×n matrix for the order-dependent
//! (unsymmetric) computation, and a packed upper-triangular matrix for the
//! symmetric computation where the mirrored lower triangle is implied.
//!
//! `AtomicTriangle` is the shared form the parallel fill writes through:
//! each cell belongs to exactly one worker, so plain relaxed stores of the
//! f64 bit pattern are sufficient and no lock is involved.

use std::sync::atomic::{AtomicU64, Ordering};

/// Dense n×n distance matrix, row-major
///
/// Entries (i,j) and (j,i) are independent; the diagonal is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    dim: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Creates a zero-filled n×n matrix
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            values: vec![0.0; dim * dim],
        }
    }

    /// Returns the number of rows (and columns)
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns entry (row, col)
    ///
    /// # Panics
    /// Panics if an index is out of range.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.dim && col < self.dim, "matrix index out of range");
        self.values[row * self.dim + col]
    }

    /// Sets entry (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(row < self.dim && col < self.dim, "matrix index out of range");
        self.values[row * self.dim + col] = value;
    }
}

/// Packed upper-triangular n×n matrix with implied mirrored lower triangle
///
/// Only the i ≤ j entries are stored (n·(n+1)/2 cells); `get(j, i)`
/// returns the stored (i, j) value. The diagonal is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetricMatrix {
    dim: usize,
    values: Vec<f64>,
}

impl SymmetricMatrix {
    /// Creates a zero-filled symmetric matrix
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            values: vec![0.0; packed_len(dim)],
        }
    }

    /// Returns the number of rows (and columns)
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns entry (row, col), mirroring across the diagonal
    ///
    /// # Panics
    /// Panics if an index is out of range.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[self.index(row, col)]
    }

    /// Sets entry (row, col); (col, row) is implied
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let idx = self.index(row, col);
        self.values[idx] = value;
    }

    /// Expands to a dense matrix with both triangles populated
    pub fn to_dense(&self) -> DistanceMatrix {
        let mut dense = DistanceMatrix::new(self.dim);
        for i in 0..self.dim {
            for j in i..self.dim {
                let value = self.get(i, j);
                dense.set(i, j, value);
                dense.set(j, i, value);
            }
        }
        dense
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(row < self.dim && col < self.dim, "matrix index out of range");
        let (lo, hi) = if row <= col { (row, col) } else { (col, row) };
        // Row lo of the packed upper triangle starts after the lo
        // preceding rows of lengths n, n-1, ..., n-lo+1.
        lo * (2 * self.dim - lo + 1) / 2 + (hi - lo)
    }
}

/// Shared triangle for the parallel fill
///
/// Stores strictly-upper entries (i < j) as f64 bit patterns in atomic
/// cells. Workers own disjoint pair sets, so every cell sees at most one
/// store; relaxed ordering is enough because the spawning thread joins all
/// workers before reading.
pub(crate) struct AtomicTriangle {
    dim: usize,
    cells: Vec<AtomicU64>,
}

impl AtomicTriangle {
    pub(crate) fn new(dim: usize) -> Self {
        let mut cells = Vec::with_capacity(packed_len(dim));
        // 0u64 is the bit pattern of 0.0f64
        cells.resize_with(packed_len(dim), || AtomicU64::new(0));
        Self { dim, cells }
    }

    /// Stores entry (row, col), row < col
    pub(crate) fn store(&self, row: usize, col: usize, value: f64) {
        debug_assert!(row < col && col < self.dim);
        let idx = row * (2 * self.dim - row + 1) / 2 + (col - row);
        self.cells[idx].store(value.to_bits(), Ordering::Relaxed);
    }

    /// Converts into the packed result matrix after all workers joined
    pub(crate) fn into_matrix(self) -> SymmetricMatrix {
        SymmetricMatrix {
            dim: self.dim,
            values: self
                .cells
                .into_iter()
                .map(|cell| f64::from_bits(cell.into_inner()))
                .collect(),
        }
    }
}

fn packed_len(dim: usize) -> usize {
    dim * (dim + 1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_get_set() {
        let mut m = DistanceMatrix::new(3);
        m.set(0, 2, 0.5);
        m.set(2, 0, 0.7);
        assert_eq!(m.get(0, 2), 0.5);
        assert_eq!(m.get(2, 0), 0.7);
        assert_eq!(m.get(1, 1), 0.0);
    }

    #[test]
    fn test_symmetric_mirrors() {
        let mut m = SymmetricMatrix::new(4);
        m.set(1, 3, 0.25);
        assert_eq!(m.get(1, 3), 0.25);
        assert_eq!(m.get(3, 1), 0.25);
        assert_eq!(m.get(2, 2), 0.0);
    }

    #[test]
    fn test_symmetric_packed_indices_are_distinct() {
        // Every (i, j) with i <= j must map to its own cell.
        let dim = 5;
        let m = SymmetricMatrix::new(dim);
        let mut seen = std::collections::HashSet::new();
        for i in 0..dim {
            for j in i..dim {
                assert!(seen.insert(m.index(i, j)), "cell collision at ({}, {})", i, j);
            }
        }
        assert_eq!(seen.len(), packed_len(dim));
    }

    #[test]
    fn test_to_dense_round_trip() {
        let mut m = SymmetricMatrix::new(3);
        m.set(0, 1, 0.1);
        m.set(0, 2, 0.2);
        m.set(1, 2, 0.3);
        let dense = m.to_dense();
        assert_eq!(dense.get(1, 0), 0.1);
        assert_eq!(dense.get(0, 2), 0.2);
        assert_eq!(dense.get(2, 1), 0.3);
        assert_eq!(dense.get(0, 0), 0.0);
    }

    #[test]
    fn test_atomic_triangle_matches_packed_layout() {
        let tri = AtomicTriangle::new(4);
        tri.store(0, 1, 0.5);
        tri.store(2, 3, 0.9);
        let m = tri.into_matrix();
        assert_eq!(m.get(0, 1), 0.5);
        assert_eq!(m.get(3, 2), 0.9);
        assert_eq!(m.get(0, 0), 0.0);
    }

    #[test]
    fn test_zero_and_one_dim() {
        let m = SymmetricMatrix::new(0);
        assert_eq!(m.dim(), 0);

        let m = SymmetricMatrix::new(1);
        assert_eq!(m.get(0, 0), 0.0);
    }
}
