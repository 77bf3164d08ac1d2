//! End-to-end tests for `toranj compare`

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const OLD_LOG: &str = "\
Thread Sequence: 1 2
param values: 100 1000
Binary,Threads,ParamValue,AverageTime,StdDev
stream_chapel,1,100,4.0,0.1
stream_chapel,2,100,2.0,0.1
stream_cpp_stream,1,100,2.0,0.1
stream_cpp_stream,2,100,4.0,0.1
heat_cpp,1,1000,8.0,0.2
heat_cpp,2,1000,ERROR
";

const NEW_LOG: &str = "\
stream_chapel,1,100,2.0,0.1
stream_chapel,2,100,1.0,0.1
stream_cpp_stream,1,100,1.0,0.1
stream_cpp_stream,2,100,1.0,0.1
heat_cpp,1,1000,4.0,0.2
";

fn toranj(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("toranj").unwrap();
    cmd.current_dir(dir).env("TORANJ_TEST_MODE", "1");
    cmd
}

fn write_logs(dir: &Path) {
    fs::write(dir.join("old.txt"), OLD_LOG).unwrap();
    fs::write(dir.join("new.txt"), NEW_LOG).unwrap();
}

#[test]
fn old_vs_new_prints_speedups_and_writes_series() {
    let temp = TempDir::new().unwrap();
    write_logs(temp.path());

    toranj(temp.path())
        .args(["compare", "old.txt", "new.txt", "-o", "cmp", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("binary,threads,param,old,new,speedup"))
        .stdout(predicate::str::contains("heat_cpp,1,1000,8,4,2"));

    for name in ["cmp_actual_oldnew_line", "cmp_speedup_bar", "cmp_speedup_line"] {
        assert!(temp.path().join(format!("{}.csv", name)).exists(), "{} missing", name);
    }
    assert!(!temp.path().join("cmp_raw_oldnew_line.csv").exists());

    let speedups = fs::read_to_string(temp.path().join("cmp_speedup_bar.csv")).unwrap();
    assert!(speedups.starts_with("label,speedup\n"));
    assert!(speedups.contains("heat_cpp/T1/P1000,2\n"));
}

#[test]
fn raw_line_writes_normalized_series() {
    let temp = TempDir::new().unwrap();
    write_logs(temp.path());

    toranj(temp.path())
        .args(["compare", "old.txt", "new.txt", "--raw-line"])
        .assert()
        .success();

    assert!(temp.path().join("comparison_raw_oldnew_line.csv").exists());
}

#[test]
fn variant_mode_marks_best_and_writes_per_log_series() {
    let temp = TempDir::new().unwrap();
    write_logs(temp.path());

    toranj(temp.path())
        .args([
            "compare",
            "old.txt",
            "new.txt",
            "--compare-variant",
            "stream",
            "--raw-line",
            "-f",
            "csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("threads,param,stream_chapel,stream_cpp_stream"))
        .stdout(predicate::str::contains("1,100,4.000000,2.000000*"))
        .stdout(predicate::str::contains("2,100,1.000000*,1.000000*"));

    for tag in ["old", "new"] {
        for kind in ["norm_{}_bar", "raw_{}_line", "actual_{}_line"] {
            let name = format!("comparison_stream_{}.csv", kind.replace("{}", tag));
            assert!(temp.path().join(&name).exists(), "{} missing", name);
        }
    }

    let norm = fs::read_to_string(temp.path().join("comparison_stream_norm_old_bar.csv")).unwrap();
    assert_eq!(
        norm,
        "label,stream_chapel,stream_cpp_stream\nT1/P100,1,0.5\nT2/P100,0.5,1\n"
    );
}

#[test]
fn variant_mode_without_reference_fails() {
    let temp = TempDir::new().unwrap();
    write_logs(temp.path());

    toranj(temp.path())
        .args(["compare", "old.txt", "--compare-variant", "heat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("heat_chapel"));
}

#[test]
fn ignore_chapel_removes_reference_binaries() {
    let temp = TempDir::new().unwrap();
    write_logs(temp.path());

    toranj(temp.path())
        .args(["compare", "old.txt", "new.txt", "--ignore-chapel", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stream_chapel").not())
        .stdout(predicate::str::contains("stream_cpp_stream,1,100,2,1,2"));
}

#[test]
fn pattern_keeps_matching_binaries() {
    let temp = TempDir::new().unwrap();
    write_logs(temp.path());

    toranj(temp.path())
        .args(["compare", "old.txt", "new.txt", "--pattern", "^heat", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"binary\": \"heat_cpp\""))
        .stdout(predicate::str::contains("stream").not());
}

#[test]
fn single_log_needs_variant_mode() {
    let temp = TempDir::new().unwrap();
    write_logs(temp.path());

    toranj(temp.path())
        .args(["compare", "old.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--compare-variant"));
}

#[test]
fn malformed_number_fails_the_parse() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("bad.txt"), "heat_cpp,1,1000,fast,0\n").unwrap();
    write_logs(temp.path());

    toranj(temp.path())
        .args(["compare", "bad.txt", "new.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse bad.txt"));
}

#[test]
fn missing_log_file_is_reported() {
    let temp = TempDir::new().unwrap();

    toranj(temp.path())
        .args(["compare", "absent.txt", "also-absent.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.txt"));
}
