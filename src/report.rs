//! Scaling summary of a result log
//!
//! Groups records by `(task, size)` and relates every thread count to the
//! single-thread time of the same group:
//!
//! - speedup `S(p) = T(1) / T(p)`
//! - efficiency `E(p) = S(p) / p`
//!
//! When a log holds several runs of the same point, the most recent row wins.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::record::MeasurementRecord;

/// One line of the scaling table.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingRow {
    /// Task name
    pub task: String,
    /// Problem size
    pub size: usize,
    /// Thread count
    pub threads: usize,
    /// Best time in seconds
    pub time: f64,
    /// `T(1) / T(p)`; `None` without a single-thread baseline
    pub speedup: Option<f64>,
    /// `speedup / p`; `None` without a single-thread baseline
    pub efficiency: Option<f64>,
}

/// Build the scaling table.
///
/// Groups appear in order of first appearance in `records`; rows within a
/// group are sorted by thread count.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn scaling_table(records: &[MeasurementRecord]) -> Vec<ScalingRow> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut latest: HashMap<(String, usize), HashMap<usize, f64>> = HashMap::new();

    for r in records {
        let key = (r.task().to_string(), r.size());
        if !latest.contains_key(&key) {
            order.push(key.clone());
        }
        latest.entry(key).or_default().insert(r.threads(), r.time());
    }

    let mut rows = Vec::new();
    for key in order {
        let Some(times) = latest.get(&key) else {
            continue;
        };
        let baseline = times.get(&1).copied();
        let mut threads: Vec<usize> = times.keys().copied().collect();
        threads.sort_unstable();

        for p in threads {
            let time = times[&p];
            let speedup = baseline.filter(|_| time > 0.0).map(|t1| t1 / time);
            rows.push(ScalingRow {
                task: key.0.clone(),
                size: key.1,
                threads: p,
                time,
                speedup,
                efficiency: speedup.map(|s| s / p as f64),
            });
        }
    }
    rows
}

/// Render the table as aligned text.
#[must_use]
pub fn render(rows: &[ScalingRow]) -> String {
    let width = rows
        .iter()
        .map(|r| r.task.len())
        .max()
        .unwrap_or(0)
        .max("task".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<width$}  {:>12}  {:>7}  {:>12}  {:>8}  {:>10}",
        "task", "size", "threads", "time (s)", "speedup", "efficiency"
    );
    for r in rows {
        let speedup = r
            .speedup
            .map_or_else(|| "-".to_string(), |s| format!("{s:.2}"));
        let efficiency = r
            .efficiency
            .map_or_else(|| "-".to_string(), |e| format!("{:.1}%", e * 100.0));
        let _ = writeln!(
            out,
            "{:<width$}  {:>12}  {:>7}  {:>12.6}  {:>8}  {:>10}",
            r.task, r.size, r.threads, r.time, speedup, efficiency,
        );
    }
    out
}
