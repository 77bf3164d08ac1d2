//! Derived comparison views
//!
//! Every function here takes its input by reference and returns a fresh value.

use serde::Serialize;
use std::collections::HashMap;

use super::table::ResultsTable;
use super::variant::VariantPivot;

/// Which side of a variant row was faster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BestOf {
    /// Reference time is the row minimum
    pub reference: bool,
    /// Alternative time is the row minimum
    pub alternative: bool,
}

/// Tag the faster side of every pivot row (ties tag both)
pub fn mark_best(pivot: &VariantPivot) -> Vec<BestOf> {
    pivot
        .rows
        .iter()
        .map(|r| {
            let best = r.reference.min(r.alternative);
            BestOf {
                reference: r.reference == best,
                alternative: r.alternative == best,
            }
        })
        .collect()
}

/// Render a time with six decimals, starred when it is the row best
pub fn format_marked(value: f64, best: bool) -> String {
    format!("{:.6}{}", value, if best { "*" } else { "" })
}

/// Divide each value by the maximum of its row
pub fn normalize_row(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    values.iter().map(|v| v / max).collect()
}

/// A pivot with every row scaled by its own maximum
pub fn normalize_rows(pivot: &VariantPivot) -> VariantPivot {
    let mut normalized = pivot.clone();
    for row in &mut normalized.rows {
        let scaled = normalize_row(&[row.reference, row.alternative]);
        row.reference = scaled[0];
        row.alternative = scaled[1];
    }
    normalized
}

/// A pivot with every value scaled by the pivot-wide maximum
pub fn normalize_global(pivot: &VariantPivot) -> VariantPivot {
    let max = pivot
        .rows
        .iter()
        .flat_map(|r| [r.reference, r.alternative])
        .fold(f64::NEG_INFINITY, f64::max);
    let mut normalized = pivot.clone();
    for row in &mut normalized.rows {
        row.reference /= max;
        row.alternative /= max;
    }
    normalized
}

/// One matched configuration of an old-vs-new comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedupRow {
    /// Binary identifier
    pub binary: String,
    /// Thread count
    pub threads: u32,
    /// Parameter value
    pub param: u64,
    /// Average time in the old dataset
    pub old_time: f64,
    /// Average time in the new dataset
    pub new_time: f64,
    /// `old_time / new_time`; above 1 means the new dataset is faster
    pub speedup: f64,
}

impl SpeedupRow {
    /// `{binary}/T{threads}/P{param}`
    pub fn label(&self) -> String {
        format!("{}/T{}/P{}", self.binary, self.threads, self.param)
    }
}

/// Inner join of two tables on (binary, threads, param)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpeedupTable {
    /// Matched rows, in the old table's order
    pub rows: Vec<SpeedupRow>,
}

impl SpeedupTable {
    /// Row labels
    pub fn labels(&self) -> Vec<String> {
        self.rows.iter().map(SpeedupRow::label).collect()
    }

    /// Old times column
    pub fn old_times(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.old_time).collect()
    }

    /// New times column
    pub fn new_times(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.new_time).collect()
    }

    /// Speedup column
    pub fn speedups(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.speedup).collect()
    }

    /// Old and new times divided by the maximum over both columns
    pub fn normalized_times(&self) -> (Vec<f64>, Vec<f64>) {
        let max = self
            .rows
            .iter()
            .flat_map(|r| [r.old_time, r.new_time])
            .fold(f64::NEG_INFINITY, f64::max);
        (
            self.rows.iter().map(|r| r.old_time / max).collect(),
            self.rows.iter().map(|r| r.new_time / max).collect(),
        )
    }
}

/// Join `old` and `new` and compute per-row speedups
///
/// Keys present on only one side are dropped. A key repeated within a table
/// yields one row per matching pair.
pub fn speedup(old: &ResultsTable, new: &ResultsTable) -> SpeedupTable {
    let mut index: HashMap<(&str, u32, u64), Vec<f64>> = HashMap::new();
    for row in &new.rows {
        index.entry(row.key()).or_default().push(row.average_time);
    }

    let rows = old
        .rows
        .iter()
        .flat_map(|o| {
            index
                .get(&o.key())
                .into_iter()
                .flatten()
                .map(move |&new_time| SpeedupRow {
                    binary: o.binary.clone(),
                    threads: o.threads,
                    param: o.param,
                    old_time: o.average_time,
                    new_time,
                    speedup: o.average_time / new_time,
                })
        })
        .collect();

    SpeedupTable { rows }
}
