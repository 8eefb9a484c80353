//! Measurable kernels
//!
//! A [`Kernel`] separates the *workload shape* ([`Kernel::generate`]) from the
//! *reduction* ([`Kernel::run`]). The runner only ever talks to this trait, so
//! the six experiments share one execution skeleton.
//!
//! ## Kernels
//!
//! | Kernel | Input | Result |
//! |--------|-------|--------|
//! | [`MinMax`] | vector | minimum or maximum element |
//! | [`Dot`] | two vectors | sum of pairwise products |
//! | [`Integral`] | length `N` | midpoint rule for the integral of `4/(1+x^2)` on `[0, 1]` |
//! | [`RowMinMax`] | dense matrix | max over rows of the row minimum |
//! | [`StructuredMinMax`] | banded / triangular matrix | same reduction as [`RowMinMax`] |
//! | [`ScheduleSum`] | length `N` | **elapsed seconds** of its own parallel section |
//!
//! ## Contract
//!
//! - `run` executes its parallel section inside the given [`WorkerPool`]
//! - `run` never mutates its input and has no side effects besides the return value
//! - a single-worker pool is a valid sequential run

mod matrix;
mod reduce;
mod schedule;

pub use matrix::{max_of_row_mins, RowMinMax, StructuredMinMax};
pub use reduce::{Dot, Integral, MinMax, VectorPair};
pub use schedule::{heavy_work, partition, ScheduleMode, ScheduleSum, WORK_PER_INDEX};

use crate::pool::WorkerPool;

/// A parallel workload under measurement.
pub trait Kernel {
    /// Workload the kernel reduces over.
    type Input: Send + Sync;

    /// Task name written to the result log.
    fn name(&self) -> &str;

    /// Build the workload for problem size `size`. Deterministic.
    fn generate(&self, size: usize) -> Self::Input;

    /// Reduce `input` using the workers of `pool`.
    fn run(&self, input: &Self::Input, pool: &WorkerPool) -> f64;
}
