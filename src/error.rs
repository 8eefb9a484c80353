//! Error types for scaling-bench
//!
//! Every failure carries the offending value so the user can fix the
//! configuration without re-reading the source.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// scaling-bench error types
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration document does not exist or cannot be opened
    #[error("Configuration not found: {}\nCreate it or pass --config <path>", .path.display())]
    ConfigNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// Configuration document is not valid JSON or has mistyped keys
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Configuration parsed but violates an invariant (empty sizes, zero repeats, ...)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unrecognized task, matrix type or schedule mode
    #[error("Unsupported {key}: '{value}'")]
    UnsupportedParameter {
        /// Configuration key the value came from
        key: &'static str,
        /// Offending value
        value: String,
    },

    /// Worker pool could not be created
    #[error("Worker pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Result log row could not be parsed
    #[error("Invalid result log line {line}: {reason}")]
    InvalidLog {
        /// 1-based line number in the log
        line: usize,
        /// What was wrong with it
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for [`Error::UnsupportedParameter`].
    #[must_use]
    pub fn unsupported(key: &'static str, value: impl Into<String>) -> Self {
        Self::UnsupportedParameter {
            key,
            value: value.into(),
        }
    }
}
