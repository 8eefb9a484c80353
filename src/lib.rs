//! # scaling-bench: Thread-Scaling Micro-Benchmarks
//!
//! Measures how parallel reduction and scan kernels scale with thread count,
//! problem size and loop-scheduling policy, keeping the best of `repeats`
//! timings per configuration point in an append-only CSV log.
//!
//! ## Design Principles
//!
//! - **Reproducible workloads**: fixed-seed generators, bit-identical data per size
//! - **Isolated points**: one worker pool per point, sized to its thread count
//! - **Sequential harness**: points are never measured concurrently
//! - **Crash-consistent log**: append-only, header once, flushed per row
//!
//! ## Example
//!
//! ```rust
//! use scaling_bench::config::ExperimentConfig;
//! use scaling_bench::runner::run_experiment;
//! use scaling_bench::sink::MemorySink;
//!
//! let config = ExperimentConfig::from_json(
//!     r#"{"task": "minmax", "sizes": [1000], "threads": [1, 2], "repeats": 2}"#,
//! )?;
//! let mut sink = MemorySink::new();
//! run_experiment(&config, &mut sink)?;
//! assert_eq!(sink.records().len(), 2);
//! # Ok::<(), scaling_bench::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod error;
pub mod kernel;
pub mod pool;
pub mod record;
pub mod report;
pub mod runner;
pub mod sink;
pub mod timer;
pub mod workload;

pub use error::{Error, Result};
pub use record::MeasurementRecord;
