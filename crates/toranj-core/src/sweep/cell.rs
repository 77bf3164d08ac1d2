//! Per-cell measurements and their log representation

use serde::{Deserialize, Serialize};

use super::profile::BinaryFamily;

/// Marker written in place of statistics when a cell measured nothing
pub const ERROR_MARKER: &str = "ERROR";

/// Observations for one (binary, threads, parameter) combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementCell {
    /// Binary identifier
    pub binary: String,
    /// Family of the binary, decides the log line shape
    pub family: BinaryFamily,
    /// Thread count
    pub threads: u32,
    /// Problem size or memory-ratio exponent
    pub param: u64,
    /// Elapsed times in seconds, one per successful run
    pub times: Vec<f64>,
    /// Throughput values, parallel to `times` for throughput binaries
    pub throughputs: Vec<f64>,
    /// Repetitions the policy asked for
    pub attempted: u32,
}

impl MeasurementCell {
    /// Start an empty cell
    pub fn new(binary: impl Into<String>, family: BinaryFamily, threads: u32, param: u64) -> Self {
        Self {
            binary: binary.into(),
            family,
            threads,
            param,
            times: Vec::new(),
            throughputs: Vec::new(),
            attempted: 0,
        }
    }

    /// Record one successful run
    pub fn record(&mut self, time: f64, throughput: Option<f64>) {
        self.times.push(time);
        if let Some(value) = throughput {
            self.throughputs.push(value);
        }
    }

    /// Number of successful runs
    pub fn successes(&self) -> usize {
        self.times.len()
    }

    /// True when no run succeeded
    pub fn is_failure(&self) -> bool {
        self.times.is_empty()
    }

    /// Mean elapsed time
    pub fn mean_time(&self) -> Option<f64> {
        mean(&self.times)
    }

    /// Sample standard deviation of elapsed time, zero below two samples
    pub fn std_dev_time(&self) -> Option<f64> {
        sample_std_dev(&self.times)
    }

    /// Mean throughput
    pub fn mean_throughput(&self) -> Option<f64> {
        mean(&self.throughputs)
    }

    /// The log line for this cell
    ///
    /// `Binary,Threads,ParamValue,AverageTime,StdDev`, with the mean throughput
    /// inserted before `AverageTime` for throughput binaries, or
    /// `Binary,Threads,ParamValue,ERROR` when nothing was measured.
    pub fn to_log_line(&self) -> String {
        let (Some(mean), Some(std_dev)) = (self.mean_time(), self.std_dev_time()) else {
            return format!(
                "{},{},{},{}",
                self.binary, self.threads, self.param, ERROR_MARKER
            );
        };

        match (self.family, self.mean_throughput()) {
            (BinaryFamily::Throughput, Some(gups)) => format!(
                "{},{},{},{},{},{}",
                self.binary, self.threads, self.param, gups, mean, std_dev
            ),
            _ => format!(
                "{},{},{},{},{}",
                self.binary, self.threads, self.param, mean, std_dev
            ),
        }
    }
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample (n - 1) standard deviation, `None` for an empty slice
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    if values.len() < 2 {
        return Some(0.0);
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}
