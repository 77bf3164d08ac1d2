//! Reference vs alternative implementation extraction

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

use super::error::VariantError;
use super::table::ResultsTable;

/// Suffix identifying the reference implementation of a benchmark
pub const REFERENCE_SUFFIX: &str = "_chapel";

/// One (threads, param) row of a variant pivot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VariantRow {
    /// Thread count
    pub threads: u32,
    /// Parameter value
    pub param: u64,
    /// Average time of the reference binary
    pub reference: f64,
    /// Average time of the alternative binary
    pub alternative: f64,
}

impl VariantRow {
    /// `T{threads}/P{param}`
    pub fn label(&self) -> String {
        format!("T{}/P{}", self.threads, self.param)
    }
}

/// Average times of two implementations side by side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantPivot {
    /// Reference binary identifier (`{base}_chapel`)
    pub reference: String,
    /// Alternative binary identifier
    pub alternative: String,
    /// Rows sorted by (threads, param)
    pub rows: Vec<VariantRow>,
}

impl VariantPivot {
    /// Row labels, in row order
    pub fn labels(&self) -> Vec<String> {
        self.rows.iter().map(VariantRow::label).collect()
    }

    /// Reference column
    pub fn reference_times(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.reference).collect()
    }

    /// Alternative column
    pub fn alternative_times(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.alternative).collect()
    }
}

/// Pattern an alternative binary must match: contains `cpp`, ends with `base`
pub fn alternative_pattern(base: &str) -> Result<Regex, VariantError> {
    Regex::new(&format!("cpp.*{}$", regex::escape(base)))
        .map_err(|e| VariantError::Pattern(e.to_string()))
}

/// Pivot `table` into reference vs alternative times for `base`
///
/// Fails if `{base}_chapel` is absent, no binary matches the alternative
/// pattern, or either binary appears twice for one (threads, param) key. When several binaries match, the lexicographically smallest one is
/// used. Keys measured by only one of the two binaries are left out.
pub fn extract_variant(table: &ResultsTable, base: &str) -> Result<VariantPivot, VariantError> {
    let reference = format!("{}{}", base, REFERENCE_SUFFIX);
    let pattern = alternative_pattern(base)?;

    let selected = table.filter(|r| r.binary == reference || pattern.is_match(&r.binary));
    let binaries = selected.binaries();
    if !binaries.contains(&reference.as_str()) {
        return Err(VariantError::MissingReference(reference));
    }

    let mut alternatives: Vec<&str> = binaries
        .into_iter()
        .filter(|b| *b != reference)
        .collect();
    alternatives.sort_unstable();
    let Some(&alternative) = alternatives.first() else {
        return Err(VariantError::MissingAlternative(base.to_string()));
    };
    if alternatives.len() > 1 {
        warn!(
            "Several C++ variants match '{}': {:?}; using {}",
            base, alternatives, alternative
        );
    }

    let mut cells: BTreeMap<(u32, u64), (Option<f64>, Option<f64>)> = BTreeMap::new();
    for row in &selected.rows {
        let entry = cells.entry((row.threads, row.param)).or_default();
        let slot = if row.binary == reference {
            &mut entry.0
        } else if row.binary == alternative {
            &mut entry.1
        } else {
            continue;
        };
        if slot.is_some() {
            return Err(VariantError::DuplicateEntry {
                binary: row.binary.clone(),
                threads: row.threads,
                param: row.param,
            });
        }
        *slot = Some(row.average_time);
    }

    let rows = cells
        .into_iter()
        .filter_map(|((threads, param), times)| match times {
            (Some(reference), Some(alternative)) => Some(VariantRow {
                threads,
                param,
                reference,
                alternative,
            }),
            _ => None,
        })
        .collect();

    Ok(VariantPivot {
        reference,
        alternative: alternative.to_string(),
        rows,
    })
}
