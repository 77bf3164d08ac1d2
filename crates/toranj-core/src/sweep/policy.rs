//! Adaptive repetition counts

use super::error::PolicyError;
use super::profile::BinaryFamily;

/// Workloads below this get `max_runs`
pub const SMALL_WORKLOAD: u64 = 10_000;

/// Workloads at or above this get `min_runs`
pub const LARGE_WORKLOAD: u64 = 10_000_000;

/// Decides how many times each cell is measured
///
/// Small workloads are noisy and cheap, so they are repeated the most; large
/// ones are repeated the least. In between, `base_runs` is halved for every
/// full decade of workload above [`SMALL_WORKLOAD`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunCountPolicy {
    min_runs: u32,
    base_runs: u32,
    max_runs: u32,
}

impl Default for RunCountPolicy {
    fn default() -> Self {
        Self {
            min_runs: 2,
            base_runs: 8,
            max_runs: 10,
        }
    }
}

impl RunCountPolicy {
    /// Create a policy, validating `1 <= min <= base <= max`
    pub fn new(min_runs: u32, base_runs: u32, max_runs: u32) -> Result<Self, PolicyError> {
        if min_runs == 0 {
            return Err(PolicyError::ZeroMinimum);
        }
        if min_runs > base_runs || base_runs > max_runs {
            return Err(PolicyError::Unordered {
                min: min_runs,
                base: base_runs,
                max: max_runs,
            });
        }
        Ok(Self {
            min_runs,
            base_runs,
            max_runs,
        })
    }

    /// Smallest repetition count this policy returns
    pub fn min_runs(&self) -> u32 {
        self.min_runs
    }

    /// Repetition count for the first decade above the small-workload bound
    pub fn base_runs(&self) -> u32 {
        self.base_runs
    }

    /// Largest repetition count this policy returns
    pub fn max_runs(&self) -> u32 {
        self.max_runs
    }

    /// Repetitions for one cell
    pub fn runs_for(&self, family: BinaryFamily, param: u64, threads: u32) -> u32 {
        if family.reports_throughput() {
            return self.min_runs;
        }

        let workload = param.saturating_mul(threads as u64);
        if workload < SMALL_WORKLOAD {
            return self.max_runs;
        }
        if workload >= LARGE_WORKLOAD {
            return self.min_runs;
        }

        let mut decades = 0u32;
        let mut bound = SMALL_WORKLOAD * 10;
        while workload >= bound {
            decades += 1;
            bound *= 10;
        }

        (self.base_runs >> decades).clamp(self.min_runs, self.max_runs)
    }
}
