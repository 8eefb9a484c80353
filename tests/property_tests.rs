//! Property-based tests for scaling-bench
//!
//! - Workload generation is bit-reproducible
//! - Parallel kernels agree with trivial sequential references at every
//!   thread count (floating-point reassociation tolerated)
//! - Schedule partitions cover the index space exactly once

use proptest::prelude::*;
use scaling_bench::kernel::{
    max_of_row_mins, partition, Dot, Kernel, MinMax, ScheduleMode, VectorPair,
};
use scaling_bench::pool::WorkerPool;
use scaling_bench::workload::{
    generate_banded, generate_matrix, generate_vector, Matrix,
};

const THREAD_COUNTS: [usize; 4] = [1, 2, 4, 8];

// ============================================================================
// Sequential references
// ============================================================================

fn seq_min(data: &[f64]) -> f64 {
    data.iter().copied().fold(f64::INFINITY, f64::min)
}

fn seq_max(data: &[f64]) -> f64 {
    data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

fn seq_dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn seq_row_min_max(m: &Matrix) -> f64 {
    (0..m.dim())
        .map(|i| seq_min(m.row(i)))
        .fold(f64::NEG_INFINITY, f64::max)
}

fn close(a: f64, b: f64, scale: f64) -> bool {
    (a - b).abs() <= 1e-9 * scale.max(1.0)
}

// ============================================================================
// Strategies
// ============================================================================

fn arb_vector(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(-1.0e3f64..1.0e3, 0..max_len)
}

fn arb_mode() -> impl Strategy<Value = ScheduleMode> {
    prop_oneof![
        Just(ScheduleMode::Static),
        Just(ScheduleMode::Dynamic),
        Just(ScheduleMode::Guided),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: same size, same bits
    #[test]
    fn prop_vector_generation_deterministic(n in 0usize..2000) {
        let a = generate_vector(n, -100.0, 100.0);
        let b = generate_vector(n, -100.0, 100.0);
        let a_bits: Vec<u64> = a.iter().map(|x| x.to_bits()).collect();
        let b_bits: Vec<u64> = b.iter().map(|x| x.to_bits()).collect();
        prop_assert_eq!(a_bits, b_bits);
    }

    /// Property: banded matrices are zero exactly outside the band
    #[test]
    fn prop_banded_zero_outside_band(n in 0usize..24, k in 0usize..6) {
        let m = generate_banded(n, k);
        for i in 0..n {
            for j in 0..n {
                prop_assert_eq!(m.get(i, j) != 0.0, i.abs_diff(j) <= k);
            }
        }
    }

    /// Property: min and max match the sequential scan
    #[test]
    fn prop_minmax_matches_sequential(data in arb_vector(500)) {
        for threads in THREAD_COUNTS {
            let pool = WorkerPool::new(threads).unwrap();
            let min = MinMax::new("minmax", true, (-1.0, 1.0)).reduce(&data, &pool);
            let max = MinMax::new("minmax", false, (-1.0, 1.0)).reduce(&data, &pool);
            prop_assert_eq!(min, seq_min(&data));
            prop_assert_eq!(max, seq_max(&data));
        }
    }

    /// Property: dot product matches the sequential sum within tolerance
    #[test]
    fn prop_dot_matches_sequential(a in arb_vector(500), b in arb_vector(500)) {
        let n = a.len().min(b.len());
        let input = VectorPair { a: a[..n].to_vec(), b: b[..n].to_vec() };
        let expected = seq_dot(&input.a, &input.b);
        let scale: f64 = input.a.iter().zip(&input.b).map(|(x, y)| (x * y).abs()).sum();
        let kernel = Dot::new("dot", (-1.0, 1.0));
        for threads in THREAD_COUNTS {
            let pool = WorkerPool::new(threads).unwrap();
            let got = kernel.run(&input, &pool);
            prop_assert!(
                close(got, expected, scale),
                "threads={} got={} expected={}",
                threads,
                got,
                expected
            );
        }
    }

    /// Property: partitions are ordered, disjoint and cover 0..n
    #[test]
    fn prop_partition_covers_range(
        n in 0usize..500,
        threads in 1usize..9,
        chunk in 0usize..8,
        mode in arb_mode()
    ) {
        let ranges = partition(n, threads, mode, chunk);
        let mut next = 0;
        for r in &ranges {
            prop_assert_eq!(r.start, next);
            prop_assert!(r.end > r.start);
            next = r.end;
        }
        prop_assert_eq!(next, n);
        if mode == ScheduleMode::Static {
            prop_assert!(ranges.len() <= threads);
        }
    }
}

// ============================================================================
// Generated workloads at fixed sizes
// ============================================================================

#[test]
fn test_row_minmax_matches_sequential_for_all_thread_counts() {
    let m = generate_matrix(64);
    let expected = seq_row_min_max(&m);
    for threads in THREAD_COUNTS {
        let pool = WorkerPool::new(threads).unwrap();
        assert_eq!(max_of_row_mins(&m, &pool), expected, "threads={threads}");
    }
}

#[test]
fn test_generated_minmax_independent_of_thread_count() {
    let kernel = MinMax::new("minmax", true, (-100.0, 100.0));
    let results: Vec<f64> = THREAD_COUNTS
        .iter()
        .map(|&t| {
            let pool = WorkerPool::new(t).unwrap();
            kernel.run(&kernel.generate(10_000), &pool)
        })
        .collect();
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_generated_dot_within_relative_tolerance() {
    let kernel = Dot::new("dot", (-100.0, 100.0));
    let input = kernel.generate(50_000);
    let expected = seq_dot(&input.a, &input.b);
    let scale: f64 = input.a.iter().zip(&input.b).map(|(x, y)| (x * y).abs()).sum();
    for threads in THREAD_COUNTS {
        let pool = WorkerPool::new(threads).unwrap();
        let got = kernel.run(&input, &pool);
        assert!(close(got, expected, scale), "threads={threads}: {got} vs {expected}");
    }
}
