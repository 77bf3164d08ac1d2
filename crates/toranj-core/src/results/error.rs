//! Results error types

use thiserror::Error;

/// A data line whose fields could not be converted
///
/// Conversion failures abort the whole parse; lines with the wrong shape are
/// skipped instead and never produce this error.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Line {line}: column {column} has invalid value {value:?}")]
pub struct ParseError {
    /// 1-based line number in the input
    pub line: usize,
    /// Column name
    pub column: &'static str,
    /// Raw field text
    pub value: String,
}

/// Variant extraction failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VariantError {
    /// The `{base}_chapel` reference binary is not in the table
    #[error("Missing {0}")]
    MissingReference(String),

    /// No binary matched the alternative pattern
    #[error("Missing C++ variant for '{0}'")]
    MissingAlternative(String),

    /// A binary was measured more than once for the same configuration
    #[error("Duplicate entry for {binary} at threads={threads} param={param}")]
    DuplicateEntry {
        /// Binary identifier
        binary: String,
        /// Thread count
        threads: u32,
        /// Parameter value
        param: u64,
    },

    /// The base name produced an unusable pattern
    #[error("Invalid variant pattern: {0}")]
    Pattern(String),
}
