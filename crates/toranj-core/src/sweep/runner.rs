//! Sequential sweep execution

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::cell::MeasurementCell;
use super::error::Result;
use super::invoke::{parse_run_output, Invocation, Invoker};
use super::log::SweepLog;
use super::plan::SweepPlan;
use super::policy::RunCountPolicy;
use super::profile::{BinaryFamily, BinaryProfile, ProfileRules};

/// Informational prefix announcing the thread ladder
pub const THREAD_SEQUENCE_PREFIX: &str = "Thread Sequence:";

/// Informational prefix announcing the swept parameter values
pub const PARAM_VALUES_PREFIX: &str = "param values:";

/// Column header for problem-size sweeps
pub const HEADER: &str = "Binary,Threads,ParamValue,AverageTime,StdDev";

/// Column header for throughput sweeps
pub const THROUGHPUT_HEADER: &str = "Binary,Threads,ParamValue,GUPS,AverageTime,StdDev";

/// A binary to sweep, classified up front
#[derive(Debug, Clone)]
pub struct SweepTarget {
    /// Path to the executable
    pub path: PathBuf,
    /// Classification of the executable
    pub profile: BinaryProfile,
}

impl SweepTarget {
    /// Classify `path` with `rules`
    pub fn new(path: impl Into<PathBuf>, rules: &ProfileRules) -> Self {
        let path = path.into();
        let profile = BinaryProfile::classify(&path, rules);
        Self { path, profile }
    }
}

/// Drives binaries through their sweep matrices one run at a time
pub struct SweepRunner<I> {
    invoker: I,
    policy: RunCountPolicy,
}

impl<I: Invoker> SweepRunner<I> {
    /// Create a runner
    pub fn new(invoker: I, policy: RunCountPolicy) -> Self {
        Self { invoker, policy }
    }

    /// Sweep one binary, appending its lines to `log`
    ///
    /// Returns the measured cells in traversal order. Individual run failures
    /// end the repetitions of their cell and are only logged; errors returned
    /// from here mean the sweep itself could not proceed.
    pub async fn run(
        &self,
        target: &SweepTarget,
        requested: &[u64],
        max_threads: u32,
        log: &mut SweepLog,
    ) -> Result<Vec<MeasurementCell>> {
        let profile = &target.profile;
        let plan = SweepPlan::new(&profile.name, profile.family, requested, max_threads)?;

        info!(
            "Sweeping {} ({} cells, {:?})",
            profile.name,
            plan.len(),
            profile.family
        );
        log.append(format!("{} {}", THREAD_SEQUENCE_PREFIX, join(&plan.threads)))?;
        log.append(format!("{} {}", PARAM_VALUES_PREFIX, join(&plan.params)))?;
        log.append(match profile.family {
            BinaryFamily::ProblemSize => HEADER,
            BinaryFamily::Throughput => THROUGHPUT_HEADER,
        })?;

        let mut cells = Vec::with_capacity(plan.len());
        for (threads, param) in plan.cells() {
            let cell = self.measure(&target.path, profile, threads, param).await;
            if cell.is_failure() {
                warn!(
                    "{} threads={} param={}: no successful runs",
                    profile.name, threads, param
                );
            }
            log.append(cell.to_log_line())?;
            cells.push(cell);
        }

        Ok(cells)
    }

    /// Measure a single cell
    pub async fn measure(
        &self,
        program: &Path,
        profile: &BinaryProfile,
        threads: u32,
        param: u64,
    ) -> MeasurementCell {
        let runs = self.policy.runs_for(profile.family, param, threads);
        let invocation = Invocation::for_cell(program, profile, threads, param);
        let mut cell = MeasurementCell::new(&profile.name, profile.family, threads, param);
        cell.attempted = runs;

        info!(
            "{} threads={} param={} runs={}",
            profile.name, threads, param, runs
        );

        for run in 1..=runs {
            let sample = match self.invoker.invoke(&invocation).await {
                Ok(stdout) => parse_run_output(&stdout, profile),
                Err(e) => Err(e),
            };
            match sample {
                Ok(sample) => cell.record(sample.time, sample.throughput),
                Err(e) => {
                    warn!(
                        "Run {}/{} of `{}` failed, skipping the rest of this cell: {}",
                        run,
                        runs,
                        invocation.display(),
                        e
                    );
                    break;
                }
            }
        }

        cell
    }
}

fn join<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
