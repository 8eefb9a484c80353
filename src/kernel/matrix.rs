//! Two-level matrix reduction: per-row minimum, then global maximum.

use std::sync::{Mutex, PoisonError};

use rayon::prelude::*;

use super::Kernel;
use crate::pool::WorkerPool;
use crate::workload::{generate_matrix, generate_structured, Matrix, MatrixType};

/// Maximum over all rows of the row minimum.
///
/// Each worker folds its rows into a local maximum, and the locals are merged
/// into one mutex-protected accumulator. An empty matrix yields `-inf`.
#[must_use]
pub fn max_of_row_mins(matrix: &Matrix, pool: &WorkerPool) -> f64 {
    let n = matrix.dim();
    if n == 0 {
        return f64::NEG_INFINITY;
    }

    let global = Mutex::new(f64::NEG_INFINITY);
    pool.install(|| {
        matrix
            .as_slice()
            .par_chunks(n)
            .fold(|| f64::NEG_INFINITY, |local, row| local.max(row_min(row)))
            .for_each(|local| {
                let mut best = global.lock().unwrap_or_else(PoisonError::into_inner);
                if local > *best {
                    *best = local;
                }
            });
    });
    global.into_inner().unwrap_or_else(PoisonError::into_inner)
}

fn row_min(row: &[f64]) -> f64 {
    row.iter().copied().fold(f64::INFINITY, f64::min)
}

/// [`max_of_row_mins`] over a dense random matrix.
#[derive(Debug, Clone)]
pub struct RowMinMax {
    name: String,
}

impl RowMinMax {
    /// Create the kernel.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Kernel for RowMinMax {
    type Input = Matrix;

    fn name(&self) -> &str {
        &self.name
    }

    fn generate(&self, size: usize) -> Matrix {
        generate_matrix(size)
    }

    fn run(&self, input: &Matrix, pool: &WorkerPool) -> f64 {
        max_of_row_mins(input, pool)
    }
}

/// [`max_of_row_mins`] over a banded or triangular matrix.
///
/// Same algorithm as [`RowMinMax`]; only the zero-fill pattern of the data
/// changes, which is what the experiment probes.
#[derive(Debug, Clone)]
pub struct StructuredMinMax {
    name: String,
    matrix_type: MatrixType,
    bandwidth: usize,
}

impl StructuredMinMax {
    /// `bandwidth` only applies to [`MatrixType::Banded`].
    #[must_use]
    pub fn new(name: impl Into<String>, matrix_type: MatrixType, bandwidth: usize) -> Self {
        Self {
            name: name.into(),
            matrix_type,
            bandwidth,
        }
    }
}

impl Kernel for StructuredMinMax {
    type Input = Matrix;

    fn name(&self) -> &str {
        &self.name
    }

    fn generate(&self, size: usize) -> Matrix {
        generate_structured(size, self.matrix_type, self.bandwidth)
    }

    fn run(&self, input: &Matrix, pool: &WorkerPool) -> f64 {
        max_of_row_mins(input, pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_matrix() {
        // Row minima: 1, -2, 5 -> max 5
        let m = Matrix::from_row_major(3, vec![1.0, 2.0, 3.0, -2.0, 9.0, 0.0, 7.0, 5.0, 6.0])
            .unwrap();
        let pool = WorkerPool::new(2).unwrap();
        assert_eq!(max_of_row_mins(&m, &pool), 5.0);
    }

    #[test]
    fn test_empty_matrix() {
        let pool = WorkerPool::new(1).unwrap();
        assert_eq!(max_of_row_mins(&Matrix::zeros(0), &pool), f64::NEG_INFINITY);
    }

    #[test]
    fn test_lower_triangular_matches_sequential_scan() {
        let k = StructuredMinMax::new("structured_minmax", MatrixType::Lower, 0);
        let m = k.generate(16);
        let pool = WorkerPool::new(4).unwrap();
        let expected = (0..16)
            .map(|i| m.row(i).iter().copied().fold(f64::INFINITY, f64::min))
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(k.run(&m, &pool), expected);
    }

    #[test]
    fn test_dense_kernel_uses_dense_generator() {
        let k = RowMinMax::new("row_minmax");
        assert_eq!(k.generate(8), generate_matrix(8));
        assert_eq!(k.name(), "row_minmax");
    }
}
