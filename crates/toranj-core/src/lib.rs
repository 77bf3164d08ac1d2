//! # toranj core
//!
//! Measurement and comparison logic for the toranj benchmark suite.
//!
//! ## Sweeps
//!
//! The [`sweep`] module drives a compiled benchmark binary across a matrix of
//! thread counts and parameter values, choosing how many repetitions each cell
//! gets and aggregating the timings into one log line per cell.
//!
//! ## Results
//!
//! The [`results`] module reads those logs back, extracts reference and
//! alternative implementations of a benchmark, and derives the normalized and
//! speedup views consumed by reports.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use toranj_core::results::{parse_log, ParseOptions};
//! use toranj_core::results::variant::extract_variant;
//!
//! let text = std::fs::read_to_string("results.txt").unwrap();
//! let table = parse_log(&text, ParseOptions::default()).unwrap();
//! let pivot = extract_variant(&table, "stream").unwrap();
//! println!("{} vs {}", pivot.reference, pivot.alternative);
//! ```

#![warn(clippy::all)]

pub mod results;
pub mod sweep;

pub use results::{parse_log, LogRecord, ParseOptions, ResultsTable};
pub use sweep::{
    BinaryFamily, BinaryProfile, MeasurementCell, RunCountPolicy, SweepLog, SweepPlan,
    SweepRunner, ThreadPassing,
};
