//! End-to-end tests for `toranj sweep`

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn toranj() -> Command {
    let mut cmd = Command::cargo_bin("toranj").unwrap();
    cmd.env("TORANJ_TEST_MODE", "1");
    cmd
}

#[test]
fn missing_binary_is_rejected() {
    toranj()
        .args(["sweep", "/no/such/heat_cpp", "--params", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Benchmark binary not found"));
}

#[test]
fn zero_max_threads_is_rejected() {
    let temp = TempDir::new().unwrap();
    let binary = temp.path().join("heat_cpp");
    std::fs::write(&binary, "").unwrap();

    toranj()
        .arg("sweep")
        .arg(&binary)
        .args(["--params", "100", "--max-threads", "0"])
        .assert()
        .failure();
}

#[test]
fn inconsistent_run_counts_are_rejected() {
    let temp = TempDir::new().unwrap();
    let binary = temp.path().join("heat_cpp");
    std::fs::write(&binary, "").unwrap();

    toranj()
        .arg("sweep")
        .arg(&binary)
        .args(["--params", "100", "--min-runs", "5", "--max-runs", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid run-count settings"));
}

#[test]
fn zero_timeout_is_rejected() {
    let temp = TempDir::new().unwrap();
    let binary = temp.path().join("heat_cpp");
    std::fs::write(&binary, "").unwrap();

    toranj()
        .arg("sweep")
        .arg(&binary)
        .args(["--params", "100", "--timeout", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1 second"));
}

#[cfg(unix)]
mod unix {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    /// Write an executable script that prints one benchmark report line
    fn fake_benchmark(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn sweeps_and_appends_to_log() {
        let temp = TempDir::new().unwrap();
        let binary = fake_benchmark(temp.path(), "heat_cpp", "echo 'heat,x,x,x,x,x,0.5'");
        let log = temp.path().join("results.txt");
        fs::write(&log, "previous run\n").unwrap();

        toranj()
            .arg("sweep")
            .arg(&binary)
            .args(["--params", "100", "-t", "2", "--min-runs", "1", "--base-runs", "1", "--max-runs", "1"])
            .arg("--log")
            .arg(&log)
            .assert()
            .success()
            .stdout(predicate::str::contains("Thread Sequence: 1 2"))
            .stdout(predicate::str::contains("heat_cpp,2,100,0.5,0"));

        let text = fs::read_to_string(&log).unwrap();
        assert_eq!(
            text,
            "previous run\n\
             Thread Sequence: 1 2\n\
             param values: 100\n\
             Binary,Threads,ParamValue,AverageTime,StdDev\n\
             heat_cpp,1,100,0.5,0\n\
             heat_cpp,2,100,0.5,0\n"
        );
    }

    #[test]
    fn chapel_binaries_read_threads_from_env() {
        let temp = TempDir::new().unwrap();
        let binary = fake_benchmark(
            temp.path(),
            "heat_chapel",
            "echo \"x,x,x,x,x,x,$CHPL_RT_NUM_THREADS_PER_LOCALE\"",
        );

        toranj()
            .arg("sweep")
            .arg(&binary)
            .args(["--params", "10", "-t", "4", "--min-runs", "1", "--base-runs", "1", "--max-runs", "1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("heat_chapel,1,10,1,0"))
            .stdout(predicate::str::contains("heat_chapel,4,10,4,0"));
    }

    #[test]
    fn failing_binary_logs_error_marker() {
        let temp = TempDir::new().unwrap();
        let binary = fake_benchmark(temp.path(), "heat_cpp", "exit 1");

        toranj()
            .arg("sweep")
            .arg(&binary)
            .args(["--params", "100", "-t", "1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("heat_cpp,1,100,ERROR"));
    }

    #[test]
    fn slow_binary_times_out() {
        let temp = TempDir::new().unwrap();
        let binary = fake_benchmark(temp.path(), "heat_cpp", "sleep 5\necho 'x,x,x,x,x,x,1.0'");

        toranj()
            .arg("sweep")
            .arg(&binary)
            .args(["--params", "100", "-t", "1", "--timeout", "1", "--min-runs", "1", "--base-runs", "1", "--max-runs", "1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("heat_cpp,1,100,ERROR"));
    }
}
