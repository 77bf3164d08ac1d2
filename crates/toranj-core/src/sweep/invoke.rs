//! Launching benchmark binaries

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use super::error::InvokeError;
use super::profile::{BinaryProfile, ThreadPassing};

/// One fully-resolved benchmark run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable to run
    pub program: PathBuf,
    /// Command-line arguments
    pub args: Vec<String>,
    /// Extra environment variables
    pub env: Vec<(String, String)>,
}

impl Invocation {
    /// Build the command line for one cell of a sweep
    pub fn for_cell(program: &Path, profile: &BinaryProfile, threads: u32, param: u64) -> Self {
        let mut args = Vec::with_capacity(2);
        let mut env = Vec::new();

        match &profile.threading {
            ThreadPassing::Flag(prefix) => args.push(format!("{}{}", prefix, threads)),
            ThreadPassing::EnvVar(name) => env.push((name.clone(), threads.to_string())),
        }
        args.push(format!("{}{}", profile.param_flag, param));

        Self {
            program: program.to_path_buf(),
            args,
            env,
        }
    }

    /// Shell-like rendering for log messages
    pub fn display(&self) -> String {
        let env: Vec<String> = self.env.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        let mut parts = env;
        parts.push(self.program.display().to_string());
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Runs a benchmark and returns its standard output
///
/// The production implementation spawns a process; tests substitute scripted
/// outputs.
#[async_trait]
pub trait Invoker: Send + Sync {
    /// Run once and return stdout on success
    async fn invoke(&self, invocation: &Invocation) -> Result<String, InvokeError>;
}

/// Spawns each invocation as a child process with a deadline
#[derive(Debug, Clone)]
pub struct ProcessInvoker {
    timeout: Duration,
}

impl ProcessInvoker {
    /// Create an invoker that kills runs exceeding `timeout`
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Invoker for ProcessInvoker {
    async fn invoke(&self, invocation: &Invocation) -> Result<String, InvokeError> {
        let program = invocation.program.display().to_string();
        debug!("Running {}", invocation.display());

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => return Err(InvokeError::Launch { program, source }),
            Err(_) => {
                return Err(InvokeError::Timeout {
                    program,
                    timeout: self.timeout,
                })
            }
        };

        if !output.status.success() {
            return Err(InvokeError::Exit {
                program,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// A parsed benchmark report line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSample {
    /// Elapsed seconds
    pub time: f64,
    /// Throughput, for throughput binaries
    pub throughput: Option<f64>,
}

/// Extract the timing fields from a benchmark's stdout
///
/// Benchmarks print exactly one comma-separated line; the last non-empty
/// line is used so stray banner output does not break parsing.
pub fn parse_run_output(stdout: &str, profile: &BinaryProfile) -> Result<RunSample, InvokeError> {
    let line = stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .ok_or_else(|| InvokeError::Output {
            line: String::new(),
            reason: "no output".to_string(),
        })?;

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let read = |index: usize, what: &str| -> Result<f64, InvokeError> {
        let raw = fields.get(index).ok_or_else(|| InvokeError::Output {
            line: line.to_string(),
            reason: format!("missing {} field {}", what, index),
        })?;
        raw.parse::<f64>().map_err(|e| InvokeError::Output {
            line: line.to_string(),
            reason: format!("{} field {} ({:?}): {}", what, index, raw, e),
        })
    };

    let time = read(profile.time_field, "time")?;
    let throughput = profile
        .throughput_field
        .map(|index| read(index, "throughput"))
        .transpose()?;

    Ok(RunSample { time, throughput })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::profile::ProfileRules;

    fn profile(name: &str) -> BinaryProfile {
        BinaryProfile::classify(Path::new(name), &ProfileRules::default())
    }

    #[test]
    fn hpx_binary_gets_thread_flag() {
        let p = profile("stream_cpp_add");
        let inv = Invocation::for_cell(Path::new("bin/stream_cpp_add"), &p, 4, 1000);
        assert_eq!(inv.args, vec!["--hpx:threads=4", "--nx=1000"]);
        assert!(inv.env.is_empty());
    }

    #[test]
    fn chapel_binary_gets_thread_env_var() {
        let p = profile("gups_chapel");
        let inv = Invocation::for_cell(Path::new("gups_chapel"), &p, 8, 2);
        assert_eq!(inv.args, vec!["--memRatio=2"]);
        assert_eq!(
            inv.env,
            vec![("CHPL_RT_NUM_THREADS_PER_LOCALE".to_string(), "8".to_string())]
        );
        assert_eq!(
            inv.display(),
            "CHPL_RT_NUM_THREADS_PER_LOCALE=8 gups_chapel --memRatio=2"
        );
    }

    #[test]
    fn parses_problem_size_output() {
        let p = profile("heat_cpp");
        let sample = parse_run_output("heat,1,100,0,0,0,0.125,extra\n", &p).unwrap();
        assert_eq!(sample.time, 0.125);
        assert_eq!(sample.throughput, None);
    }

    #[test]
    fn parses_throughput_output() {
        let p = profile("gups_cpp");
        let sample = parse_run_output("gups, 0.5, 0.0123\n", &p).unwrap();
        assert_eq!(sample.time, 0.5);
        assert_eq!(sample.throughput, Some(0.0123));
    }

    #[test]
    fn short_output_is_rejected() {
        let p = profile("heat_cpp");
        let err = parse_run_output("heat,1,100\n", &p).unwrap_err();
        assert!(matches!(err, InvokeError::Output { .. }));
    }

    #[test]
    fn non_numeric_time_is_rejected() {
        let p = profile("gups_cpp");
        assert!(parse_run_output("gups,fast,1.0", &p).is_err());
        assert!(parse_run_output("", &p).is_err());
    }
}
