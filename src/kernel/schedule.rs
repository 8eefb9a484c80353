//! Loop-scheduling comparison kernel
//!
//! Sums a fixed-cost per-index computation over `0..N` under one of three
//! partitioning policies and reports how long the parallel section took.
//! The result value *is* a time: the experiment compares policies, so the
//! sum itself is only logged at debug level.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use rayon::prelude::*;
use tracing::debug;

use super::Kernel;
use crate::pool::WorkerPool;
use crate::timer::time;
use crate::{Error, Result};

/// Sine evaluations per index in [`heavy_work`].
pub const WORK_PER_INDEX: usize = 5000;

/// Fixed-cost synthetic work for index `i`.
#[must_use]
pub fn heavy_work(i: usize) -> f64 {
    let base = i as f64 * 1e-5;
    (0..WORK_PER_INDEX).map(|k| (base + k as f64).sin()).sum()
}

/// How `0..N` is cut into chunks for the workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleMode {
    /// One contiguous block per worker, fixed up front
    Static,
    /// Fixed-size chunks claimed on demand
    Dynamic,
    /// Chunks of `remaining / threads`, shrinking as work drains
    Guided,
}

impl ScheduleMode {
    /// All modes, in the order they are measured by default.
    pub const ALL: [Self; 3] = [Self::Static, Self::Dynamic, Self::Guided];

    /// Config spelling of this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Dynamic => "dynamic",
            Self::Guided => "guided",
        }
    }
}

impl fmt::Display for ScheduleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "static" => Ok(Self::Static),
            "dynamic" => Ok(Self::Dynamic),
            "guided" => Ok(Self::Guided),
            other => Err(Error::unsupported("schedule_mode", other)),
        }
    }
}

/// Split `0..n` into ordered, disjoint, contiguous chunks.
///
/// `threads` and `chunk` are clamped to at least 1.
///
/// - static: `threads` blocks whose sizes differ by at most one
/// - dynamic: blocks of `chunk` indices (the last may be shorter)
/// - guided: blocks of `max(ceil(remaining / threads), chunk)` indices
#[must_use]
pub fn partition(n: usize, threads: usize, mode: ScheduleMode, chunk: usize) -> Vec<Range<usize>> {
    let threads = threads.max(1);
    let chunk = chunk.max(1);
    let mut ranges = Vec::new();

    match mode {
        ScheduleMode::Static => {
            let base = n / threads;
            let extra = n % threads;
            let mut start = 0;
            for t in 0..threads {
                let len = base + usize::from(t < extra);
                if len == 0 {
                    break;
                }
                ranges.push(start..start + len);
                start += len;
            }
        }
        ScheduleMode::Dynamic => {
            let mut start = 0;
            while start < n {
                let end = n.min(start + chunk);
                ranges.push(start..end);
                start = end;
            }
        }
        ScheduleMode::Guided => {
            let mut start = 0;
            while start < n {
                let remaining = n - start;
                let len = remaining.div_ceil(threads).max(chunk).min(remaining);
                ranges.push(start..start + len);
                start += len;
            }
        }
    }
    ranges
}

/// Sum of [`heavy_work`] over `0..N` under a [`ScheduleMode`].
///
/// [`Kernel::run`] returns the elapsed seconds of the parallel section.
#[derive(Debug, Clone)]
pub struct ScheduleSum {
    name: String,
    mode: ScheduleMode,
    chunk: usize,
}

impl ScheduleSum {
    /// Task name becomes `<prefix>_<mode>`, e.g. `schedule_guided`.
    #[must_use]
    pub fn new(prefix: &str, mode: ScheduleMode, chunk: usize) -> Self {
        Self {
            name: format!("{prefix}_{mode}"),
            mode,
            chunk,
        }
    }

    /// Compute the sum under this variant's policy.
    ///
    /// Static and guided run one task per [`partition`] block; those plans
    /// have at most `threads` and `O(threads * log N)` blocks. Dynamic
    /// splits the index range lazily into pieces of at most `chunk` indices
    /// and allocates no plan.
    #[must_use]
    pub fn sum(&self, n: usize, pool: &WorkerPool) -> f64 {
        pool.install(|| match self.mode {
            ScheduleMode::Dynamic => (0..n)
                .into_par_iter()
                .with_max_len(self.chunk.max(1))
                .map(heavy_work)
                .sum::<f64>(),
            ScheduleMode::Static | ScheduleMode::Guided => {
                partition(n, pool.threads(), self.mode, self.chunk)
                    .par_iter()
                    .with_max_len(1)
                    .map(|r| r.clone().map(heavy_work).sum::<f64>())
                    .sum::<f64>()
            }
        })
    }
}

impl Kernel for ScheduleSum {
    type Input = usize;

    fn name(&self) -> &str {
        &self.name
    }

    fn generate(&self, size: usize) -> usize {
        size
    }

    fn run(&self, input: &usize, pool: &WorkerPool) -> f64 {
        let (elapsed, sum) = time(|| self.sum(*input, pool));
        debug!(mode = %self.mode, n = *input, sum, "schedule section done");
        elapsed
    }
}
