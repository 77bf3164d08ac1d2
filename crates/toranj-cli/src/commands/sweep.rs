use anyhow::{bail, Context, Result};
use std::fs::OpenOptions;
use std::io;
use tracing::info;

use toranj_core::sweep::{ProcessInvoker, SweepLog, SweepRunner, SweepTarget, Tee};

use crate::cli::SweepArgs;
use crate::config::CliConfig;

/// Sweep every binary in order, echoing each line and appending it to `--log`
pub async fn execute(args: SweepArgs, config: &CliConfig) -> Result<()> {
    for binary in &args.binaries {
        if !binary.is_file() {
            bail!("Benchmark binary not found: {}", binary.display());
        }
    }

    let params = if args.params.is_empty() {
        config.sweep.params.clone()
    } else {
        args.params.clone()
    };
    let max_threads = args.max_threads.unwrap_or_else(|| config.max_threads());
    let timeout = config.timeout(args.timeout)?;
    let policy = config.run_policy(args.min_runs, args.base_runs, args.max_runs)?;

    let mut log = match &args.log {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            SweepLog::new(Tee::new(io::stdout(), file))
        }
        None => SweepLog::new(io::stdout()),
    };

    let runner = SweepRunner::new(ProcessInvoker::new(timeout), policy);
    for binary in &args.binaries {
        let target = SweepTarget::new(binary, &config.binary);
        runner
            .run(&target, &params, max_threads, &mut log)
            .await
            .with_context(|| format!("Sweep of {} failed", binary.display()))?;
    }

    info!("Sweep finished: {} lines logged", log.lines().len());
    Ok(())
}
