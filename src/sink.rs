//! Result sinks
//!
//! The runner hands every finished [`MeasurementRecord`] to a [`ResultSink`].
//! [`CsvSink`] is the durable append-only log; [`MemorySink`] collects records
//! for tests and programmatic callers.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::record::{MeasurementRecord, HEADER};
use crate::Result;

/// Destination for finished measurements.
pub trait ResultSink {
    /// Append exactly one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be persisted.
    fn append(&mut self, record: &MeasurementRecord) -> Result<()>;
}

impl<S: ResultSink + ?Sized> ResultSink for &mut S {
    fn append(&mut self, record: &MeasurementRecord) -> Result<()> {
        (**self).append(record)
    }
}

/// In-memory sink.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    records: Vec<MeasurementRecord>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records in append order.
    #[must_use]
    pub fn records(&self) -> &[MeasurementRecord] {
        &self.records
    }
}

impl ResultSink for MemorySink {
    fn append(&mut self, record: &MeasurementRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// Append-only CSV log.
///
/// The file is opened in append mode and never truncated. The header is
/// written before the first row only if the file was empty when opened, so
/// repeated runs against one path accumulate history under a single header.
/// Every row is flushed as soon as it is appended.
#[derive(Debug)]
pub struct CsvSink {
    path: PathBuf,
    file: File,
    needs_header: bool,
}

impl CsvSink {
    /// Open (or create) `path` for appending, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the directory or file cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let needs_header = file.metadata()?.len() == 0;
        debug!(path = %path.display(), needs_header, "result log opened");
        Ok(Self {
            path: path.to_path_buf(),
            file,
            needs_header,
        })
    }

    /// Destination path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for CsvSink {
    fn append(&mut self, record: &MeasurementRecord) -> Result<()> {
        let mut chunk = String::new();
        if self.needs_header {
            chunk.push_str(HEADER);
            chunk.push('\n');
        }
        chunk.push_str(&record.to_csv_row());
        chunk.push('\n');

        self.file.write_all(chunk.as_bytes())?;
        self.file.flush()?;
        self.needs_header = false;
        Ok(())
    }
}

/// Read every record of a result log.
///
/// Header lines (there may be several if files were concatenated) and blank
/// lines are skipped.
///
/// # Errors
///
/// [`crate::Error::Io`] if the file cannot be read,
/// [`crate::Error::InvalidLog`] for a malformed row.
pub fn read_log(path: impl AsRef<Path>) -> Result<Vec<MeasurementRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed == HEADER {
            continue;
        }
        records.push(MeasurementRecord::parse_csv_row(trimmed, idx + 1)?);
    }
    Ok(records)
}
