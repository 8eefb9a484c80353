//! Experiment configuration
//!
//! A JSON document is read into a [`ConfigDocument`] (every key optional,
//! missing keys take documented defaults), optionally patched by the command
//! line, then validated into an immutable [`ExperimentConfig`].
//!
//! ```json
//! {
//!   "task": "structured_minmax",
//!   "sizes": [500, 1000],
//!   "threads": [1, 2, 4, 8],
//!   "repeats": 3,
//!   "matrix_type": "banded",
//!   "bandwidth": 4,
//!   "output": "results/structured.csv"
//! }
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::kernel::ScheduleMode;
use crate::workload::{MatrixType, DEFAULT_VECTOR_MAX, DEFAULT_VECTOR_MIN};
use crate::{Error, Result};

/// Default problem sizes.
pub const DEFAULT_SIZES: [usize; 3] = [1_000, 100_000, 10_000_000];

/// Default thread counts.
pub const DEFAULT_THREADS: [usize; 4] = [1, 2, 4, 8];

/// Default number of trials per configuration point.
pub const DEFAULT_REPEATS: usize = 3;

/// Which kernel an experiment measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Vector minimum / maximum
    MinMax,
    /// Vector dot product
    Dot,
    /// Numerical integration converging to pi
    Integral,
    /// Dense matrix max of row minima
    RowMinMax,
    /// Banded / triangular matrix max of row minima
    StructuredMinMax,
    /// Loop-scheduling policy comparison
    Schedule,
}

impl TaskKind {
    /// Every task, in documentation order.
    pub const ALL: [Self; 6] = [
        Self::MinMax,
        Self::Dot,
        Self::Integral,
        Self::RowMinMax,
        Self::StructuredMinMax,
        Self::Schedule,
    ];

    /// Canonical name; also the task column of the result log.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MinMax => "minmax",
            Self::Dot => "dot",
            Self::Integral => "integral",
            Self::RowMinMax => "row_minmax",
            Self::StructuredMinMax => "structured_minmax",
            Self::Schedule => "schedule",
        }
    }

    /// Numbered alias accepted for older configuration files.
    const fn legacy_name(self) -> &'static str {
        match self {
            Self::MinMax => "task1_minmax",
            Self::Dot => "task2_dot",
            Self::Integral => "task3_integral",
            Self::RowMinMax => "task4_row_minmax",
            Self::StructuredMinMax => "task5_special_matrix",
            Self::Schedule => "task6_schedule",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s || t.legacy_name() == s)
            .ok_or_else(|| Error::unsupported("task", s))
    }
}

/// Kernel-specific parameters, already validated.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskSpec {
    /// Vector minimum (`find_min`) or maximum
    MinMax {
        /// Reduce to the minimum instead of the maximum
        find_min: bool,
        /// Range of generated values
        range: (f64, f64),
    },
    /// Vector dot product
    Dot {
        /// Range of generated values
        range: (f64, f64),
    },
    /// Midpoint-rule integration
    Integral,
    /// Dense matrix max of row minima
    RowMinMax,
    /// Structured matrix max of row minima
    StructuredMinMax {
        /// Zero-fill pattern
        matrix_type: MatrixType,
        /// Half-width of the band, used by [`MatrixType::Banded`]
        bandwidth: usize,
    },
    /// Scheduling-policy comparison, one variant per mode
    Schedule {
        /// Modes in measurement order
        modes: Vec<ScheduleMode>,
        /// Minimum chunk for dynamic and guided partitioning
        chunk: usize,
    },
}

impl TaskSpec {
    /// Selector of this spec.
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        match self {
            Self::MinMax { .. } => TaskKind::MinMax,
            Self::Dot { .. } => TaskKind::Dot,
            Self::Integral => TaskKind::Integral,
            Self::RowMinMax => TaskKind::RowMinMax,
            Self::StructuredMinMax { .. } => TaskKind::StructuredMinMax,
            Self::Schedule { .. } => TaskKind::Schedule,
        }
    }
}

/// The configuration-space sweep shared by all tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sweep {
    /// Problem sizes, in measurement order
    pub sizes: Vec<usize>,
    /// Thread counts, in measurement order
    pub threads: Vec<usize>,
    /// Trials per configuration point; the fastest is kept
    pub repeats: usize,
}

impl Sweep {
    /// Build a sweep, rejecting empty sequences, zero threads and zero repeats.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the violated constraint.
    pub fn new(sizes: Vec<usize>, threads: Vec<usize>, repeats: usize) -> Result<Self> {
        if sizes.is_empty() {
            return Err(Error::InvalidConfig("'sizes' must not be empty".to_string()));
        }
        if threads.is_empty() {
            return Err(Error::InvalidConfig(
                "'threads' must not be empty".to_string(),
            ));
        }
        if threads.contains(&0) {
            return Err(Error::InvalidConfig(
                "'threads' entries must be at least 1".to_string(),
            ));
        }
        if repeats == 0 {
            return Err(Error::InvalidConfig(
                "'repeats' must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            sizes,
            threads,
            repeats,
        })
    }

    /// Number of `(threads, size)` pairs.
    #[must_use]
    pub fn points(&self) -> usize {
        self.sizes.len() * self.threads.len()
    }
}

/// A validated, immutable experiment description.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    /// Kernel and its parameters
    pub task: TaskSpec,
    /// Sizes, thread counts and repeats
    pub sweep: Sweep,
    /// Result log destination
    pub output: PathBuf,
}

impl ExperimentConfig {
    /// Read and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigNotFound`] if the file is missing, [`Error::ConfigParse`]
    /// for malformed JSON, and the validation errors of
    /// [`ConfigDocument::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        ConfigDocument::load(path)?.validate()
    }

    /// Parse and validate a JSON string.
    ///
    /// # Errors
    ///
    /// Same as [`ExperimentConfig::load`], minus the file lookup.
    pub fn from_json(json: &str) -> Result<Self> {
        ConfigDocument::from_json(json)?.validate()
    }
}

/// Schedule modes may be written as one string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ModeList {
    /// `"schedule_mode": "guided"`
    One(String),
    /// `"schedule_mode": ["static", "guided"]`
    Many(Vec<String>),
}

impl Default for ModeList {
    fn default() -> Self {
        Self::Many(
            ScheduleMode::ALL
                .iter()
                .map(|m| m.as_str().to_string())
                .collect(),
        )
    }
}

impl ModeList {
    fn parse(&self) -> Result<Vec<ScheduleMode>> {
        match self {
            Self::One(mode) => Ok(vec![mode.parse()?]),
            Self::Many(modes) => modes.iter().map(|m| m.parse()).collect(),
        }
    }
}

/// Raw configuration document; every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigDocument {
    /// Kernel selector
    pub task: String,
    /// Problem sizes
    pub sizes: Vec<usize>,
    /// Thread counts
    pub threads: Vec<usize>,
    /// Trials per point
    pub repeats: usize,
    /// `minmax`: minimum instead of maximum
    pub find_min: bool,
    /// `structured_minmax`: `banded`, `lower` or `upper`
    pub matrix_type: String,
    /// `structured_minmax`: band half-width
    pub bandwidth: usize,
    /// `schedule`: modes to compare
    pub schedule_mode: ModeList,
    /// `schedule`: minimum chunk size
    pub chunk: usize,
    /// Vector kernels: lower bound of generated values
    pub vector_min: f64,
    /// Vector kernels: upper bound of generated values
    pub vector_max: f64,
    /// Result log path; defaults to `results/<task>.csv`
    pub output: Option<PathBuf>,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self {
            task: TaskKind::MinMax.as_str().to_string(),
            sizes: DEFAULT_SIZES.to_vec(),
            threads: DEFAULT_THREADS.to_vec(),
            repeats: DEFAULT_REPEATS,
            find_min: true,
            matrix_type: MatrixType::Banded.as_str().to_string(),
            bandwidth: 1,
            schedule_mode: ModeList::default(),
            chunk: 1,
            vector_min: DEFAULT_VECTOR_MIN,
            vector_max: DEFAULT_VECTOR_MAX,
            output: None,
        }
    }
}

impl ConfigDocument {
    /// Read a document from disk.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigNotFound`] if the file is missing, [`Error::ConfigParse`]
    /// for malformed JSON, [`Error::Io`] for other read failures.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::ConfigNotFound {
                path: path.to_path_buf(),
            },
            _ => Error::Io(e),
        })?;
        Self::from_json(&text)
    }

    /// Parse a document from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] for malformed JSON or mistyped keys.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check every key and build the immutable configuration.
    ///
    /// Matrix type and schedule modes are checked even when the selected task
    /// does not use them, so a typo never goes unnoticed.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedParameter`] for an unknown task, matrix type or
    /// schedule mode; [`Error::InvalidConfig`] for empty sequences, zero
    /// threads or repeats, or an empty value range.
    pub fn validate(&self) -> Result<ExperimentConfig> {
        let kind: TaskKind = self.task.parse()?;
        let matrix_type: MatrixType = self.matrix_type.parse()?;
        let modes = self.schedule_mode.parse()?;
        if modes.is_empty() {
            return Err(Error::InvalidConfig(
                "'schedule_mode' must name at least one mode".to_string(),
            ));
        }
        let range = (self.vector_min, self.vector_max);
        let range_ok = range.0.is_finite() && range.1.is_finite() && range.0 < range.1;
        if !range_ok {
            return Err(Error::InvalidConfig(format!(
                "vector range [{}, {}) is empty or not finite",
                range.0, range.1
            )));
        }

        let sweep = Sweep::new(self.sizes.clone(), self.threads.clone(), self.repeats)?;
        let task = match kind {
            TaskKind::MinMax => TaskSpec::MinMax {
                find_min: self.find_min,
                range,
            },
            TaskKind::Dot => TaskSpec::Dot { range },
            TaskKind::Integral => TaskSpec::Integral,
            TaskKind::RowMinMax => TaskSpec::RowMinMax,
            TaskKind::StructuredMinMax => TaskSpec::StructuredMinMax {
                matrix_type,
                bandwidth: self.bandwidth,
            },
            TaskKind::Schedule => TaskSpec::Schedule {
                modes,
                chunk: self.chunk.max(1),
            },
        };
        let output = self
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("results/{kind}.csv")));

        Ok(ExperimentConfig {
            task,
            sweep,
            output,
        })
    }
}

/// Parse a human-readable size string.
///
/// Accepts `1M`, `2.5m`, `100K`, `1_000_000` and plain integers.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] for anything else.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_size(s: &str) -> Result<usize> {
    let s = s.trim();
    let invalid =
        |e: &dyn fmt::Display| Error::InvalidConfig(format!("invalid size '{s}': {e}"));

    let scaled = |prefix: &str, factor: f64| -> Result<usize> {
        let num: f64 = prefix.replace('_', "").parse().map_err(|e| invalid(&e))?;
        if !num.is_finite() || num < 0.0 {
            return Err(invalid(&"must be a non-negative number"));
        }
        Ok((num * factor).round() as usize)
    };

    if let Some(prefix) = s.strip_suffix('M').or_else(|| s.strip_suffix('m')) {
        return scaled(prefix, 1_000_000.0);
    }
    if let Some(prefix) = s.strip_suffix('K').or_else(|| s.strip_suffix('k')) {
        return scaled(prefix, 1_000.0);
    }
    s.replace('_', "").parse::<usize>().map_err(|e| invalid(&e))
}

/// Parse a list of size strings.
///
/// # Errors
///
/// Fails on the first invalid entry.
pub fn parse_sizes(raw: &[String]) -> Result<Vec<usize>> {
    raw.iter().map(|s| parse_size(s)).collect()
}
