//! Benchmark sweeps
//!
//! A sweep runs one binary over every (thread count, parameter) cell of its
//! [`SweepPlan`], one process at a time. The number of repetitions per cell
//! comes from the [`RunCountPolicy`]; the timings are aggregated into a
//! [`MeasurementCell`] and appended to a [`SweepLog`] as a single CSV line.
//!
//! Runs never overlap: at most one benchmark process exists at any time.

mod cell;
mod error;
mod invoke;
mod log;
mod plan;
mod policy;
mod profile;
mod runner;

pub use cell::{mean, sample_std_dev, MeasurementCell, ERROR_MARKER};
pub use error::{InvokeError, PolicyError, Result, SweepError};
pub use invoke::{parse_run_output, Invocation, Invoker, ProcessInvoker, RunSample};
pub use log::{SweepLog, Tee};
pub use plan::{parameter_values, thread_ladder, SweepPlan};
pub use policy::{RunCountPolicy, LARGE_WORKLOAD, SMALL_WORKLOAD};
pub use profile::{BinaryFamily, BinaryProfile, ProfileRules, ThreadPassing};
pub use runner::{
    SweepRunner, SweepTarget, HEADER, PARAM_VALUES_PREFIX, THREAD_SEQUENCE_PREFIX,
    THROUGHPUT_HEADER,
};
