//! Measurement Record - one row of the result log

use crate::{Error, Result};

/// Header row of every result log.
pub const HEADER: &str = "task,threads,size,time,result";

/// Best-of-N timing for one configuration point.
///
/// `time` is the minimum elapsed wall-clock seconds over all trials and
/// `result` is the value returned by the last trial.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRecord {
    task: String,
    threads: usize,
    size: usize,
    time: f64,
    result: f64,
}

impl MeasurementRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(
        task: impl Into<String>,
        threads: usize,
        size: usize,
        time: f64,
        result: f64,
    ) -> Self {
        Self {
            task: task.into(),
            threads,
            size,
            time,
            result,
        }
    }

    /// Task (kernel) name.
    #[must_use]
    pub fn task(&self) -> &str {
        &self.task
    }

    /// Worker count the point was measured with.
    #[must_use]
    pub const fn threads(&self) -> usize {
        self.threads
    }

    /// Problem size.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Best elapsed time, in seconds.
    #[must_use]
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// Kernel result of the last trial.
    #[must_use]
    pub const fn result(&self) -> f64 {
        self.result
    }

    /// Comma-separated row, without a trailing newline.
    #[must_use]
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.task, self.threads, self.size, self.time, self.result
        )
    }

    /// Parse a row produced by [`MeasurementRecord::to_csv_row`].
    ///
    /// `line` is the 1-based line number used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLog`] if the row does not have five fields or
    /// a numeric field fails to parse.
    pub fn parse_csv_row(row: &str, line: usize) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidLog { line, reason };

        let fields: Vec<&str> = row.trim_end_matches(['\r', '\n']).split(',').collect();
        let [task, threads, size, time, result] = fields.as_slice() else {
            return Err(invalid(format!("expected 5 fields, found {}", fields.len())));
        };

        Ok(Self {
            task: (*task).to_string(),
            threads: threads
                .parse()
                .map_err(|e| invalid(format!("threads '{threads}': {e}")))?,
            size: size
                .parse()
                .map_err(|e| invalid(format!("size '{size}': {e}")))?,
            time: time
                .parse()
                .map_err(|e| invalid(format!("time '{time}': {e}")))?,
            result: result
                .parse()
                .map_err(|e| invalid(format!("result '{result}': {e}")))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_row_format() {
        let r = MeasurementRecord::new("minmax", 4, 1000, 0.25, -99.5);
        assert_eq!(r.to_csv_row(), "minmax,4,1000,0.25,-99.5");
    }

    #[test]
    fn test_small_times_stay_decimal() {
        let r = MeasurementRecord::new("dot", 1, 10, 0.000_001_5, 3.0);
        assert_eq!(r.to_csv_row(), "dot,1,10,0.0000015,3");
    }

    #[test]
    fn test_parse_row() {
        let r = MeasurementRecord::parse_csv_row("integral,8,10000,0.0012,3.1416\r\n", 2).unwrap();
        assert_eq!(r.task(), "integral");
        assert_eq!(r.threads(), 8);
        assert_eq!(r.size(), 10_000);
        assert!((r.time() - 0.0012).abs() < f64::EPSILON);
        assert!((r.result() - 3.1416).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_infinite_result() {
        let r = MeasurementRecord::new("minmax", 1, 0, 0.0, f64::INFINITY);
        let back = MeasurementRecord::parse_csv_row(&r.to_csv_row(), 1).unwrap();
        assert_eq!(back.result(), f64::INFINITY);
    }

    #[test]
    fn test_parse_errors_carry_line() {
        let err = MeasurementRecord::parse_csv_row("a,b", 7).unwrap_err();
        assert!(err.to_string().contains("line 7"));
        let err = MeasurementRecord::parse_csv_row("minmax,x,1,0.1,2", 3).unwrap_err();
        assert!(err.to_string().contains("threads 'x'"));
    }
}
