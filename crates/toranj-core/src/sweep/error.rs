//! Sweep error types

use std::time::Duration;
use thiserror::Error;

/// Errors that end a whole sweep (as opposed to a single cell)
#[derive(Debug, Error)]
pub enum SweepError {
    /// Maximum thread count must be at least one
    #[error("Maximum thread count must be positive, got {0}")]
    InvalidMaxThreads(u32),

    /// No parameter values were requested
    #[error("No parameter values given for {0}")]
    NoParameters(String),

    /// Run-count policy bounds are inconsistent
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// The sweep log could not be written
    #[error("Failed to write sweep log: {0}")]
    Log(#[from] std::io::Error),
}

/// Invalid run-count policy bounds
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    /// `min_runs` must be at least one
    #[error("min_runs must be at least 1")]
    ZeroMinimum,

    /// Bounds must satisfy `min_runs <= base_runs <= max_runs`
    #[error("Run counts must satisfy min <= base <= max (got {min}, {base}, {max})")]
    Unordered {
        /// Configured minimum
        min: u32,
        /// Configured base
        base: u32,
        /// Configured maximum
        max: u32,
    },
}

/// A single failed benchmark invocation
///
/// These never abort a sweep; they end the repetitions of the current cell.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The process could not be started
    #[error("Failed to launch {program}: {source}")]
    Launch {
        /// Program that failed to start
        program: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The process ran past its deadline and was killed
    #[error("{program} timed out after {timeout:?}")]
    Timeout {
        /// Program that timed out
        program: String,
        /// Deadline that was exceeded
        timeout: Duration,
    },

    /// The process exited unsuccessfully
    #[error("{program} exited with status {code:?}: {stderr}")]
    Exit {
        /// Program that failed
        program: String,
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// Standard output did not contain the expected fields
    #[error("Unparsable output {line:?}: {reason}")]
    Output {
        /// The offending stdout line
        line: String,
        /// What was wrong with it
        reason: String,
    },
}

/// Specialized Result type for sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;
