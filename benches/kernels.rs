//! Kernel benchmarks (criterion cross-check of the harness timings)
//!
//! Measures each kernel at one size across thread counts, so criterion's
//! statistics can be compared against the harness's best-of-N numbers.
//!
//! Run with: cargo bench --bench kernels

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scaling_bench::kernel::{
    Dot, Integral, Kernel, MinMax, RowMinMax, ScheduleMode, ScheduleSum, StructuredMinMax,
};
use scaling_bench::pool::WorkerPool;
use scaling_bench::workload::MatrixType;

const VECTOR_SIZE: usize = 1_000_000;
const MATRIX_SIZE: usize = 1_000;
const SCHEDULE_SIZE: usize = 2_000;
const THREADS: [usize; 3] = [1, 2, 4];

fn bench_kernel<K: Kernel>(c: &mut Criterion, group_name: &str, kernel: &K, size: usize) {
    let mut group = c.benchmark_group(group_name);
    group.sample_size(10);
    let input = kernel.generate(size);

    for threads in THREADS {
        let pool = WorkerPool::new(threads).expect("worker pool");
        group.bench_with_input(BenchmarkId::new(kernel.name(), threads), &input, |b, input| {
            b.iter(|| kernel.run(black_box(input), &pool));
        });
    }

    group.finish();
}

fn bench_vectors(c: &mut Criterion) {
    bench_kernel(c, "minmax", &MinMax::new("min", true, (-100.0, 100.0)), VECTOR_SIZE);
    bench_kernel(c, "dot", &Dot::new("dot", (-100.0, 100.0)), VECTOR_SIZE);
    bench_kernel(c, "integral", &Integral::new("integral"), VECTOR_SIZE);
}

fn bench_matrices(c: &mut Criterion) {
    bench_kernel(c, "row_minmax", &RowMinMax::new("dense"), MATRIX_SIZE);
    for matrix_type in [MatrixType::Banded, MatrixType::Lower, MatrixType::Upper] {
        let kernel = StructuredMinMax::new(matrix_type.as_str(), matrix_type, 8);
        bench_kernel(c, "structured_minmax", &kernel, MATRIX_SIZE);
    }
}

fn bench_schedule(c: &mut Criterion) {
    for mode in ScheduleMode::ALL {
        let kernel = ScheduleSum::new("schedule", mode, 1);
        bench_kernel(c, "schedule", &kernel, SCHEDULE_SIZE);
    }
}

criterion_group!(benches, bench_vectors, bench_matrices, bench_schedule);
criterion_main!(benches);
