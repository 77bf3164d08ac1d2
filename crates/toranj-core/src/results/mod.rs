//! Sweep log parsing and comparison
//!
//! Logs are read leniently: informational lines and anything that does not
//! have the [`LogRecord`] shape are skipped, so raw terminal captures can be
//! fed in directly. From a [`ResultsTable`] the [`variant`] module builds
//! reference-vs-alternative pivots and [`compare`] derives normalized and
//! speedup views.

pub mod compare;
mod error;
mod table;
pub mod variant;

pub use compare::{
    format_marked, mark_best, normalize_global, normalize_row, normalize_rows, speedup, BestOf,
    SpeedupRow, SpeedupTable,
};
pub use error::{ParseError, VariantError};
pub use table::{
    classify_line, parse_log, LineKind, LogRecord, ParseOptions, ResultsTable, SKIPPED_PREFIXES,
};
pub use variant::{extract_variant, VariantPivot, VariantRow};
