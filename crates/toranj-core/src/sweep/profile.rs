//! Binary classification
//!
//! A benchmark binary is classified once, when a sweep is configured, and the
//! resulting [`BinaryProfile`] is threaded through the runner. Nothing
//! downstream inspects the binary name again.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// What a benchmark binary measures and how it reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryFamily {
    /// Takes a problem size and reports elapsed time
    ProblemSize,
    /// Takes a memory ratio exponent and reports throughput alongside time
    Throughput,
}

impl BinaryFamily {
    /// Whether log lines for this family carry a throughput column
    pub fn reports_throughput(self) -> bool {
        matches!(self, BinaryFamily::Throughput)
    }
}

/// How the thread count reaches the benchmark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadPassing {
    /// Appended to a command-line flag prefix, e.g. `--hpx:threads=`
    Flag(String),
    /// Exported through the named environment variable
    EnvVar(String),
}

/// Name markers and invocation conventions used to classify binaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileRules {
    /// Case-insensitive substring that marks a throughput binary
    pub throughput_marker: String,
    /// Case-insensitive substring that marks a binary taking threads from the environment
    pub env_thread_marker: String,
    /// Flag prefix for thread counts
    pub thread_flag: String,
    /// Environment variable for thread counts
    pub thread_env_var: String,
    /// Flag prefix for problem sizes
    pub size_flag: String,
    /// Flag prefix for memory ratios
    pub mem_ratio_flag: String,
    /// Output field (0-indexed) holding elapsed time for problem-size binaries
    pub size_time_field: usize,
    /// Output field holding elapsed time for throughput binaries
    pub throughput_time_field: usize,
    /// Output field holding the throughput value
    pub throughput_value_field: usize,
}

impl Default for ProfileRules {
    fn default() -> Self {
        Self {
            throughput_marker: "gups".to_string(),
            env_thread_marker: "chapel".to_string(),
            thread_flag: "--hpx:threads=".to_string(),
            thread_env_var: "CHPL_RT_NUM_THREADS_PER_LOCALE".to_string(),
            size_flag: "--nx=".to_string(),
            mem_ratio_flag: "--memRatio=".to_string(),
            size_time_field: 6,
            throughput_time_field: 1,
            throughput_value_field: 2,
        }
    }
}

/// Everything the runner needs to know about one benchmark binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryProfile {
    /// Identifier written to the log (the executable's file name)
    pub name: String,
    /// Measurement family
    pub family: BinaryFamily,
    /// Thread-count transport
    pub threading: ThreadPassing,
    /// Flag prefix for the parameter value
    pub param_flag: String,
    /// Field holding elapsed time
    pub time_field: usize,
    /// Field holding throughput, for throughput binaries
    pub throughput_field: Option<usize>,
}

impl BinaryProfile {
    /// Classify a binary by its file name
    pub fn classify(path: &Path, rules: &ProfileRules) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let lowered = name.to_lowercase();

        let family = if lowered.contains(&rules.throughput_marker.to_lowercase()) {
            BinaryFamily::Throughput
        } else {
            BinaryFamily::ProblemSize
        };

        let threading = if lowered.contains(&rules.env_thread_marker.to_lowercase()) {
            ThreadPassing::EnvVar(rules.thread_env_var.clone())
        } else {
            ThreadPassing::Flag(rules.thread_flag.clone())
        };

        let (param_flag, time_field, throughput_field) = match family {
            BinaryFamily::ProblemSize => (rules.size_flag.clone(), rules.size_time_field, None),
            BinaryFamily::Throughput => (
                rules.mem_ratio_flag.clone(),
                rules.throughput_time_field,
                Some(rules.throughput_value_field),
            ),
        };

        Self {
            name,
            family,
            threading,
            param_flag,
            time_field,
            throughput_field,
        }
    }
}
