//! Parsed result tables

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::ParseError;
use crate::sweep::{PARAM_VALUES_PREFIX, THREAD_SEQUENCE_PREFIX};

/// Prefixes of lines that are never data
pub const SKIPPED_PREFIXES: [&str; 3] = [THREAD_SEQUENCE_PREFIX, PARAM_VALUES_PREFIX, "Binary"];

/// One data row of a sweep log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Binary identifier
    pub binary: String,
    /// Thread count
    pub threads: u32,
    /// Problem size or memory-ratio exponent
    pub param: u64,
    /// Mean elapsed seconds
    pub average_time: f64,
    /// Second statistic (the standard deviation for sweep logs)
    pub stat2: f64,
    /// Mean throughput, only for six-field lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throughput: Option<f64>,
}

impl LogRecord {
    /// Field count of a standard data line
    pub const FIELDS: usize = 5;

    /// Field count of a throughput data line
    pub const THROUGHPUT_FIELDS: usize = 6;

    /// (binary, threads, param) join key
    pub fn key(&self) -> (&str, u32, u64) {
        (&self.binary, self.threads, self.param)
    }
}

/// Parser switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Also accept six-field throughput lines
    pub include_throughput: bool,
}

/// Rows parsed from one log, in input order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsTable {
    /// Data rows
    pub rows: Vec<LogRecord>,
}

/// Outcome of classifying a single input line
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    /// Blank or informational, skipped
    Skipped,
    /// Wrong number of fields, dropped
    Dropped,
    /// A data row
    Record(LogRecord),
}

/// Classify one line; `line_no` is 1-based and only used in errors
pub fn classify_line(
    line: &str,
    line_no: usize,
    options: ParseOptions,
) -> Result<LineKind, ParseError> {
    if line.trim().is_empty() || SKIPPED_PREFIXES.iter().any(|p| line.starts_with(p)) {
        return Ok(LineKind::Skipped);
    }

    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    let (binary, threads, param, rest) = match parts.as_slice() {
        [b, t, p, rest @ ..]
            if rest.len() == LogRecord::FIELDS - 3
                || (options.include_throughput
                    && rest.len() == LogRecord::THROUGHPUT_FIELDS - 3) =>
        {
            (*b, *t, *p, rest)
        }
        _ => return Ok(LineKind::Dropped),
    };

    let err = |column: &'static str, value: &str| ParseError {
        line: line_no,
        column,
        value: value.to_string(),
    };
    let float = |column: &'static str, value: &str| {
        value.parse::<f64>().map_err(|_| err(column, value))
    };

    let threads = threads.parse::<u32>().map_err(|_| err("Threads", threads))?;
    let param = param.parse::<u64>().map_err(|_| err("ParamValue", param))?;
    let (throughput, average_time, stat2) = match rest {
        [avg, stat2] => (None, float("AverageTime", avg)?, float("Stat2", stat2)?),
        [gups, avg, stat2] => (
            Some(float("GUPS", gups)?),
            float("AverageTime", avg)?,
            float("Stat2", stat2)?,
        ),
        _ => return Ok(LineKind::Dropped),
    };

    Ok(LineKind::Record(LogRecord {
        binary: binary.to_string(),
        threads,
        param,
        average_time,
        stat2,
        throughput,
    }))
}

/// Parse a raw sweep log
///
/// Blank lines, informational lines and lines with the wrong number of fields
/// are skipped. A data-shaped line whose fields do not convert fails the
/// whole parse.
pub fn parse_log(text: &str, options: ParseOptions) -> Result<ResultsTable, ParseError> {
    let mut rows = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if let LineKind::Record(record) = classify_line(line, idx + 1, options)? {
            rows.push(record);
        }
    }
    Ok(ResultsTable { rows })
}

impl ResultsTable {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct binary identifiers, in order of first appearance
    pub fn binaries(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.binary.as_str()) {
                seen.push(&row.binary);
            }
        }
        seen
    }

    /// Rows satisfying `keep`, as a new table
    pub fn filter(&self, keep: impl Fn(&LogRecord) -> bool) -> ResultsTable {
        ResultsTable {
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Drop rows whose binary contains `needle`, ignoring case
    pub fn without_binaries_containing(&self, needle: &str) -> ResultsTable {
        let needle = needle.to_lowercase();
        self.filter(|r| !r.binary.to_lowercase().contains(&needle))
    }

    /// Keep rows whose binary matches `pattern` anywhere
    pub fn matching(&self, pattern: &Regex) -> ResultsTable {
        self.filter(|r| pattern.is_match(&r.binary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const SAMPLE: &str = "\
Thread Sequence: 1 2
param values: 100 1000
Binary,Threads,ParamValue,AverageTime,StdDev
stream_chapel,1,100,0.5,0.01

stream_cpp,1,100,0.25,0.02
gups_cpp,1,1,0.1,0.5,0.0
stream_cpp,2,100,ERROR
INFO: build finished
";

    #[test]
    fn keeps_only_five_field_rows_in_order() {
        let table = parse_log(SAMPLE, ParseOptions::default()).unwrap();
        let names: Vec<&str> = table.rows.iter().map(|r| r.binary.as_str()).collect();
        assert_eq!(names, vec!["stream_chapel", "stream_cpp"]);
        assert_eq!(table.rows[1].average_time, 0.25);
        assert_eq!(table.rows[1].stat2, 0.02);
        assert_eq!(table.rows[1].throughput, None);
    }

    #[test]
    fn throughput_rows_are_opt_in() {
        let options = ParseOptions {
            include_throughput: true,
        };
        let table = parse_log(SAMPLE, options).unwrap();
        assert_eq!(table.len(), 3);
        let gups = &table.rows[2];
        assert_eq!(gups.key(), ("gups_cpp", 1, 1));
        assert_eq!(gups.throughput, Some(0.1));
        assert_eq!(gups.average_time, 0.5);
        assert_eq!(gups.stat2, 0.0);
    }

    #[test_case("a,1,2,3,4", true ; "five fields")]
    #[test_case("a,1,2,3", false ; "four fields")]
    #[test_case("a,1,2,3,4,5,6", false ; "seven fields")]
    #[test_case("Binary,Threads,ParamValue,AverageTime,StdDev", false ; "header")]
    #[test_case("   ", false ; "blank")]
    #[test_case("x, 4 , 10 , 1.5 , 0", true ; "padded")]
    fn record_contract(line: &str, is_record: bool) {
        let kind = classify_line(line, 1, ParseOptions::default()).unwrap();
        assert_eq!(matches!(kind, LineKind::Record(_)), is_record);
    }

    #[test]
    fn conversion_failure_is_fatal() {
        let err = parse_log("ok,1,2,3.0,4.0\nbad,one,2,3.0,4.0\n", ParseOptions::default())
            .unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.column, "Threads");
        assert_eq!(err.value, "one");
    }

    #[test]
    fn bad_float_is_fatal() {
        let err = parse_log("x,1,2,fast,0\n", ParseOptions::default()).unwrap_err();
        assert_eq!(err.column, "AverageTime");
    }

    #[test]
    fn filters_return_new_tables() {
        let table = parse_log(SAMPLE, ParseOptions::default()).unwrap();
        let no_chapel = table.without_binaries_containing("CHAPEL");
        assert_eq!(no_chapel.binaries(), vec!["stream_cpp"]);
        assert_eq!(table.len(), 2);

        let cpp = table.matching(&Regex::new("^stream_c").unwrap());
        assert_eq!(cpp.binaries(), vec!["stream_chapel", "stream_cpp"]);
        let only_cpp = table.matching(&Regex::new("cpp$").unwrap());
        assert_eq!(only_cpp.len(), 1);
    }
}
