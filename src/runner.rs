//! Experiment runner
//!
//! Turns a [`Sweep`] into an ordered sequence of timed kernel invocations:
//!
//! ```text
//! for threads in sweep.threads          (outer)
//!   for size in sweep.sizes             (middle)
//!     for kernel in variants            (inner: schedule modes, else one)
//!       pool   = WorkerPool::new(threads)
//!       input  = kernel.generate(size)
//!       repeat sweep.repeats times: Timer::start -> kernel.run -> Timer::stop
//!       sink.append(name, threads, size, min elapsed, last result)
//! ```
//!
//! Points are measured one at a time, never concurrently. Records reach the
//! sink in exactly this order, and the first error aborts the run; rows
//! appended before it stay in the log.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::config::{ConfigDocument, ExperimentConfig, Sweep, TaskSpec};
use crate::kernel::{Dot, Integral, Kernel, MinMax, RowMinMax, ScheduleSum, StructuredMinMax};
use crate::pool::WorkerPool;
use crate::record::MeasurementRecord;
use crate::sink::{CsvSink, ResultSink};
use crate::timer::Timer;
use crate::Result;

/// Fastest of `repeats` trials and the value of the last one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trials {
    /// Minimum elapsed seconds
    pub best_time: f64,
    /// Result of the final trial
    pub last_result: f64,
}

/// Time `repeats` invocations of `kernel` on `input`.
///
/// Kernel results are deterministic for identical inputs, so keeping only
/// the last one loses nothing. `repeats` of zero is treated as one.
pub fn measure<K: Kernel>(
    kernel: &K,
    input: &K::Input,
    pool: &WorkerPool,
    repeats: usize,
) -> Trials {
    let mut best_time = f64::INFINITY;
    let mut last_result = 0.0;
    for trial in 0..repeats.max(1) {
        let timer = Timer::start();
        last_result = kernel.run(input, pool);
        let elapsed = timer.stop();
        debug!(kernel = kernel.name(), trial, elapsed, "trial");
        best_time = best_time.min(elapsed);
    }
    Trials {
        best_time,
        last_result,
    }
}

/// Measure every `(threads, size, variant)` point of `sweep` and append one
/// record per point to `sink`. Returns the number of records appended.
///
/// # Errors
///
/// Fails on the first worker-pool or sink error.
pub fn run_sweep<K, S>(variants: &[K], sweep: &Sweep, sink: &mut S) -> Result<usize>
where
    K: Kernel,
    S: ResultSink + ?Sized,
{
    let mut emitted = 0;
    for &threads in &sweep.threads {
        for &size in &sweep.sizes {
            for kernel in variants {
                let pool = WorkerPool::new(threads)?;
                let input = kernel.generate(size);
                let trials = measure(kernel, &input, &pool, sweep.repeats);
                drop(input);
                drop(pool);

                if !trials.last_result.is_finite() {
                    warn!(
                        kernel = kernel.name(),
                        threads,
                        size,
                        result = trials.last_result,
                        "non-finite result"
                    );
                }
                let record = MeasurementRecord::new(
                    kernel.name(),
                    threads,
                    size,
                    trials.best_time,
                    trials.last_result,
                );
                sink.append(&record)?;
                emitted += 1;
                info!(
                    "[{threads} {}] {}, N={size}, time={:.6}s, result={}",
                    if threads == 1 { "thread" } else { "threads" },
                    record.task(),
                    record.time(),
                    record.result()
                );
            }
        }
    }
    Ok(emitted)
}

/// Build the kernel variants for `config` and run its sweep into `sink`.
///
/// # Errors
///
/// See [`run_sweep`].
pub fn run_experiment<S>(config: &ExperimentConfig, sink: &mut S) -> Result<usize>
where
    S: ResultSink + ?Sized,
{
    let name = config.task.kind().as_str();
    let sweep = &config.sweep;
    info!(
        task = name,
        points = sweep.points(),
        repeats = sweep.repeats,
        output = %config.output.display(),
        "starting experiment"
    );

    let emitted = match &config.task {
        TaskSpec::MinMax { find_min, range } => {
            run_sweep(&[MinMax::new(name, *find_min, *range)], sweep, sink)?
        }
        TaskSpec::Dot { range } => run_sweep(&[Dot::new(name, *range)], sweep, sink)?,
        TaskSpec::Integral => run_sweep(&[Integral::new(name)], sweep, sink)?,
        TaskSpec::RowMinMax => run_sweep(&[RowMinMax::new(name)], sweep, sink)?,
        TaskSpec::StructuredMinMax {
            matrix_type,
            bandwidth,
        } => {
            let label = format!("{name}_{matrix_type}");
            run_sweep(
                &[StructuredMinMax::new(label, *matrix_type, *bandwidth)],
                sweep,
                sink,
            )?
        }
        TaskSpec::Schedule { modes, chunk } => {
            let variants: Vec<ScheduleSum> = modes
                .iter()
                .map(|&mode| ScheduleSum::new(name, mode, *chunk))
                .collect();
            run_sweep(&variants, sweep, sink)?
        }
    };

    info!(task = name, records = emitted, "experiment complete");
    Ok(emitted)
}

/// Validate `doc`, open its result log and run the experiment.
///
/// The log is only created once the whole document is valid. Returns the
/// number of records appended and the log path.
///
/// # Errors
///
/// Validation errors of [`ConfigDocument::validate`], then sink and
/// worker-pool errors of [`run_experiment`].
pub fn run_document(doc: &ConfigDocument) -> Result<(usize, PathBuf)> {
    let config = doc.validate()?;
    let mut sink = CsvSink::open(&config.output)?;
    let records = run_experiment(&config, &mut sink)?;
    Ok((records, sink.path().to_path_buf()))
}
