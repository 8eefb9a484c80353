//! Deterministic workload generation
//!
//! Every generator reseeds on each call, so the same `(seed, size, shape)`
//! always yields bit-identical data regardless of call order or thread count.
//!
//! | Family | Seed | Range |
//! |--------|------|-------|
//! | vectors | [`VECTOR_SEED`] | caller-chosen, default `[-100, 100)` |
//! | dense matrix | [`DENSE_MATRIX_SEED`] | `[-1000, 1000)` |
//! | banded / triangular | [`STRUCTURED_SEED`] | `[-1000, 1000)` inside, `0.0` outside |

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Error, Result};

/// Seed for vector workloads.
pub const VECTOR_SEED: u64 = 42;

/// Seed for dense matrix workloads.
pub const DENSE_MATRIX_SEED: u64 = 12_345;

/// Seed shared by the banded and triangular generators.
pub const STRUCTURED_SEED: u64 = 123_456;

/// Default lower bound for vector entries.
pub const DEFAULT_VECTOR_MIN: f64 = -100.0;

/// Default upper bound for vector entries.
pub const DEFAULT_VECTOR_MAX: f64 = 100.0;

const MATRIX_MIN: f64 = -1000.0;
const MATRIX_MAX: f64 = 1000.0;

/// Seeded uniform source backing every generator in this module.
#[derive(Debug)]
pub struct WorkloadGenerator {
    rng: StdRng,
}

impl WorkloadGenerator {
    /// Create a new generator with a fixed seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw one value uniformly from `[min, max)`.
    ///
    /// A degenerate range (`min >= max`) yields `min`.
    pub fn sample(&mut self, min: f64, max: f64) -> f64 {
        if min < max {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Draw one nonzero value from `[min, max)`; zero draws are repeated.
    fn sample_nonzero(&mut self, min: f64, max: f64) -> f64 {
        loop {
            let v = self.sample(min, max);
            if v != 0.0 || min >= max {
                return v;
            }
        }
    }

    /// Generate `count` values uniformly distributed on `[min, max)`.
    pub fn uniform(&mut self, count: usize, min: f64, max: f64) -> Vec<f64> {
        (0..count).map(|_| self.sample(min, max)).collect()
    }
}

/// Square matrix stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    n: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// All-zero `n x n` matrix.
    #[must_use]
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    /// Wrap an existing row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `data.len() != n * n`.
    pub fn from_row_major(n: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != n * n {
            return Err(Error::InvalidConfig(format!(
                "matrix buffer has {} entries, expected {}x{}",
                data.len(),
                n,
                n
            )));
        }
        Ok(Self { n, data })
    }

    /// Dimension `N` of the `N x N` matrix.
    #[must_use]
    pub const fn dim(&self) -> usize {
        self.n
    }

    /// Row-major backing buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Entry at row `i`, column `j`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Row `i` as a slice.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    fn set(&mut self, i: usize, j: usize, v: f64) {
        self.data[i * self.n + j] = v;
    }
}

/// Zero-fill pattern of a structured matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixType {
    /// Nonzero only where `|i - j| <= bandwidth`
    Banded,
    /// Nonzero only where `j <= i`
    Lower,
    /// Nonzero only where `j >= i`
    Upper,
}

impl MatrixType {
    /// Config spelling of this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Banded => "banded",
            Self::Lower => "lower",
            Self::Upper => "upper",
        }
    }
}

impl fmt::Display for MatrixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatrixType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "banded" => Ok(Self::Banded),
            "lower" => Ok(Self::Lower),
            "upper" => Ok(Self::Upper),
            other => Err(Error::unsupported("matrix_type", other)),
        }
    }
}

/// Vector of length `n` with entries uniform on `[min, max)`, seeded with [`VECTOR_SEED`].
#[must_use]
pub fn generate_vector(n: usize, min: f64, max: f64) -> Vec<f64> {
    generate_vector_seeded(n, min, max, VECTOR_SEED)
}

/// Vector of length `n` drawn from an explicit seed.
#[must_use]
pub fn generate_vector_seeded(n: usize, min: f64, max: f64, seed: u64) -> Vec<f64> {
    WorkloadGenerator::new(seed).uniform(n, min, max)
}

/// Dense `n x n` matrix, entries uniform on `[-1000, 1000)`.
#[must_use]
pub fn generate_matrix(n: usize) -> Matrix {
    let data = WorkloadGenerator::new(DENSE_MATRIX_SEED).uniform(n * n, MATRIX_MIN, MATRIX_MAX);
    Matrix { n, data }
}

/// Banded matrix: entries with `|i - j| <= bandwidth` are random, the rest are zero.
#[must_use]
pub fn generate_banded(n: usize, bandwidth: usize) -> Matrix {
    fill_structured(n, |i| {
        let start = i.saturating_sub(bandwidth);
        let end = n.min(i.saturating_add(bandwidth).saturating_add(1));
        start..end
    })
}

/// Lower-triangular matrix, diagonal included.
#[must_use]
pub fn generate_lower_triangular(n: usize) -> Matrix {
    fill_structured(n, |i| 0..i + 1)
}

/// Upper-triangular matrix, diagonal included.
#[must_use]
pub fn generate_upper_triangular(n: usize) -> Matrix {
    fill_structured(n, |i| i..n)
}

/// Dispatch to the structured generator for `matrix_type`.
#[must_use]
pub fn generate_structured(n: usize, matrix_type: MatrixType, bandwidth: usize) -> Matrix {
    match matrix_type {
        MatrixType::Banded => generate_banded(n, bandwidth),
        MatrixType::Lower => generate_lower_triangular(n),
        MatrixType::Upper => generate_upper_triangular(n),
    }
}

/// Fill the column range returned by `columns(i)` of every row, in row-major order.
fn fill_structured(n: usize, columns: impl Fn(usize) -> std::ops::Range<usize>) -> Matrix {
    let mut gen = WorkloadGenerator::new(STRUCTURED_SEED);
    let mut m = Matrix::zeros(n);
    for i in 0..n {
        for j in columns(i) {
            m.set(i, j, gen.sample_nonzero(MATRIX_MIN, MATRIX_MAX));
        }
    }
    m
}
