//! Vector reductions: min/max, dot product, numerical integration.

use rayon::prelude::*;

use super::Kernel;
use crate::pool::WorkerPool;
use crate::workload::{generate_vector, generate_vector_seeded, VECTOR_SEED};

/// Minimum or maximum element of a vector.
///
/// The accumulator is seeded with the identity of the reduction, so an empty
/// vector yields `+inf` (min) or `-inf` (max) instead of panicking.
#[derive(Debug, Clone)]
pub struct MinMax {
    name: String,
    find_min: bool,
    range: (f64, f64),
}

impl MinMax {
    /// `find_min` selects the reduction; `range` bounds the generated values.
    #[must_use]
    pub fn new(name: impl Into<String>, find_min: bool, range: (f64, f64)) -> Self {
        Self {
            name: name.into(),
            find_min,
            range,
        }
    }

    /// Reduce `data` in parallel.
    #[must_use]
    pub fn reduce(&self, data: &[f64], pool: &WorkerPool) -> f64 {
        pool.install(|| {
            if self.find_min {
                data.par_iter().copied().reduce(|| f64::INFINITY, f64::min)
            } else {
                data.par_iter()
                    .copied()
                    .reduce(|| f64::NEG_INFINITY, f64::max)
            }
        })
    }
}

impl Kernel for MinMax {
    type Input = Vec<f64>;

    fn name(&self) -> &str {
        &self.name
    }

    fn generate(&self, size: usize) -> Vec<f64> {
        generate_vector(size, self.range.0, self.range.1)
    }

    fn run(&self, input: &Vec<f64>, pool: &WorkerPool) -> f64 {
        self.reduce(input, pool)
    }
}

/// Two equal-length operand vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorPair {
    /// Left operand
    pub a: Vec<f64>,
    /// Right operand
    pub b: Vec<f64>,
}

/// Dot product of two vectors.
#[derive(Debug, Clone)]
pub struct Dot {
    name: String,
    range: (f64, f64),
}

impl Dot {
    /// `range` bounds both generated operands.
    #[must_use]
    pub fn new(name: impl Into<String>, range: (f64, f64)) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }
}

impl Kernel for Dot {
    type Input = VectorPair;

    fn name(&self) -> &str {
        &self.name
    }

    fn generate(&self, size: usize) -> VectorPair {
        let (min, max) = self.range;
        VectorPair {
            a: generate_vector(size, min, max),
            b: generate_vector_seeded(size, min, max, VECTOR_SEED + 1),
        }
    }

    fn run(&self, input: &VectorPair, pool: &WorkerPool) -> f64 {
        pool.install(|| {
            input
                .a
                .par_iter()
                .zip(input.b.par_iter())
                .map(|(x, y)| x * y)
                .sum::<f64>()
        })
    }
}

/// Midpoint-rule approximation of the integral of `4 / (1 + x^2)` over `[0, 1]`,
/// which converges to pi. Only the problem size matters; there is no buffer.
#[derive(Debug, Clone)]
pub struct Integral {
    name: String,
}

impl Integral {
    /// Create the kernel.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Integrate with `intervals` sub-intervals; zero intervals yield `0.0`.
    #[must_use]
    pub fn integrate(intervals: usize, pool: &WorkerPool) -> f64 {
        if intervals == 0 {
            return 0.0;
        }
        let h = 1.0 / intervals as f64;
        let sum = pool.install(|| {
            (0..intervals)
                .into_par_iter()
                .map(|i| {
                    let x = (i as f64 + 0.5) * h;
                    4.0 / (1.0 + x * x)
                })
                .sum::<f64>()
        });
        h * sum
    }
}

impl Kernel for Integral {
    type Input = usize;

    fn name(&self) -> &str {
        &self.name
    }

    fn generate(&self, size: usize) -> usize {
        size
    }

    fn run(&self, input: &usize, pool: &WorkerPool) -> f64 {
        Self::integrate(*input, pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(threads: usize) -> WorkerPool {
        WorkerPool::new(threads).unwrap()
    }

    #[test]
    fn test_min_and_max() {
        let data = vec![3.0, -7.5, 12.25, 0.0, 4.0];
        let p = pool(2);
        assert_eq!(MinMax::new("minmax", true, (-1.0, 1.0)).reduce(&data, &p), -7.5);
        assert_eq!(MinMax::new("minmax", false, (-1.0, 1.0)).reduce(&data, &p), 12.25);
    }

    #[test]
    fn test_minmax_empty_is_identity() {
        let p = pool(1);
        assert_eq!(MinMax::new("minmax", true, (-1.0, 1.0)).reduce(&[], &p), f64::INFINITY);
        assert_eq!(
            MinMax::new("minmax", false, (-1.0, 1.0)).reduce(&[], &p),
            f64::NEG_INFINITY
        );
    }

    #[test]
    fn test_minmax_generated_within_range() {
        let k = MinMax::new("minmax", true, (-100.0, 100.0));
        let data = k.generate(1000);
        let m = k.run(&data, &pool(4));
        assert!((-100.0..100.0).contains(&m));
        assert!(data.iter().all(|&x| x >= m));
    }

    #[test]
    fn test_dot_small() {
        let input = VectorPair {
            a: vec![1.0, 2.0, 3.0],
            b: vec![4.0, 5.0, 6.0],
        };
        let k = Dot::new("dot", (-1.0, 1.0));
        assert!((k.run(&input, &pool(2)) - 32.0).abs() < 1e-12);
    }

    #[test]
    fn test_dot_operands_differ() {
        let input = Dot::new("dot", (-100.0, 100.0)).generate(64);
        assert_eq!(input.a.len(), 64);
        assert_eq!(input.b.len(), 64);
        assert_ne!(input.a, input.b);
    }

    #[test]
    fn test_dot_empty() {
        let k = Dot::new("dot", (-1.0, 1.0));
        assert_eq!(k.run(&k.generate(0), &pool(2)), 0.0);
    }

    #[test]
    fn test_integral_approximates_pi() {
        let pi = Integral::integrate(10_000, &pool(1));
        assert!((pi - std::f64::consts::PI).abs() < 1e-3, "got {pi}");
    }

    #[test]
    fn test_integral_zero_intervals() {
        assert_eq!(Integral::integrate(0, &pool(1)), 0.0);
    }

    #[test]
    fn test_integral_single_interval() {
        // Midpoint x = 0.5: 4 / 1.25
        assert!((Integral::integrate(1, &pool(1)) - 3.2).abs() < 1e-12);
    }
}
