//! Sweep matrix construction

use super::error::{Result, SweepError};
use super::profile::BinaryFamily;

/// Powers of two from 1 up to the largest power of two not above `max_threads`
pub fn thread_ladder(max_threads: u32) -> Result<Vec<u32>> {
    if max_threads == 0 {
        return Err(SweepError::InvalidMaxThreads(max_threads));
    }

    let top = 1u32 << (u32::BITS - 1 - max_threads.leading_zeros());
    Ok(std::iter::successors(Some(1u32), |t| t.checked_mul(2))
        .take_while(|&t| t <= top)
        .collect())
}

/// Parameter values actually swept for a binary family
///
/// Throughput binaries ignore the requested values and sweep memory-ratio
/// exponents `1, 2, 4, ...`, one per requested value.
pub fn parameter_values(family: BinaryFamily, requested: &[u64]) -> Vec<u64> {
    match family {
        BinaryFamily::ProblemSize => requested.to_vec(),
        BinaryFamily::Throughput => (0..requested.len())
            .map(|i| 1u64.checked_shl(i as u32).unwrap_or(u64::MAX))
            .collect(),
    }
}

/// The thread x parameter matrix for one binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepPlan {
    /// Thread counts, ascending
    pub threads: Vec<u32>,
    /// Parameter values, in request order
    pub params: Vec<u64>,
}

impl SweepPlan {
    /// Build the matrix for a binary
    pub fn new(
        binary: &str,
        family: BinaryFamily,
        requested: &[u64],
        max_threads: u32,
    ) -> Result<Self> {
        if requested.is_empty() {
            return Err(SweepError::NoParameters(binary.to_string()));
        }
        Ok(Self {
            threads: thread_ladder(max_threads)?,
            params: parameter_values(family, requested),
        })
    }

    /// Cells in traversal order: thread-major, parameter-minor
    pub fn cells(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.threads
            .iter()
            .flat_map(move |&t| self.params.iter().map(move |&p| (t, p)))
    }

    /// Number of cells in the matrix
    pub fn len(&self) -> usize {
        self.threads.len() * self.params.len()
    }

    /// True when the matrix has no cells
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case(1, &[1])]
    #[test_case(2, &[1, 2])]
    #[test_case(6, &[1, 2, 4])]
    #[test_case(8, &[1, 2, 4, 8])]
    #[test_case(15, &[1, 2, 4, 8])]
    fn ladder_stops_at_largest_power_of_two(max: u32, expected: &[u32]) {
        assert_eq!(thread_ladder(max).unwrap(), expected);
    }

    #[test]
    fn zero_max_threads_is_rejected() {
        assert!(matches!(
            thread_ladder(0),
            Err(SweepError::InvalidMaxThreads(0))
        ));
    }

    #[test]
    fn throughput_parameters_are_powers_of_two() {
        let params = parameter_values(BinaryFamily::Throughput, &[100, 1000, 10000, 5]);
        assert_eq!(params, vec![1, 2, 4, 8]);
    }

    #[test]
    fn problem_size_parameters_are_kept() {
        let params = parameter_values(BinaryFamily::ProblemSize, &[1000, 100]);
        assert_eq!(params, vec![1000, 100]);
    }

    #[test]
    fn cells_are_thread_major() {
        let plan = SweepPlan::new("x", BinaryFamily::ProblemSize, &[10, 20], 2).unwrap();
        let cells: Vec<_> = plan.cells().collect();
        assert_eq!(cells, vec![(1, 10), (1, 20), (2, 10), (2, 20)]);
        assert_eq!(plan.len(), 4);
    }

    #[test]
    fn empty_parameter_list_is_rejected() {
        let err = SweepPlan::new("heat_cpp", BinaryFamily::ProblemSize, &[], 4).unwrap_err();
        assert!(err.to_string().contains("heat_cpp"));
    }

    proptest! {
        #[test]
        fn ladder_brackets_max(max in 1u32..=u32::MAX) {
            let ladder = thread_ladder(max).unwrap();
            let top = *ladder.last().unwrap();
            prop_assert_eq!(ladder[0], 1);
            prop_assert!(top <= max);
            prop_assert!((top as u64) * 2 > max as u64);
            for pair in ladder.windows(2) {
                prop_assert_eq!(pair[1], pair[0] * 2);
            }
        }

        #[test]
        fn plan_is_deterministic(max in 1u32..512, n in 1usize..8) {
            let requested: Vec<u64> = (1..=n as u64).map(|v| v * 100).collect();
            let a = SweepPlan::new("b", BinaryFamily::Throughput, &requested, max).unwrap();
            let b = SweepPlan::new("b", BinaryFamily::Throughput, &requested, max).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
