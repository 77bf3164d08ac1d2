//! CMake build script generation and execution

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::io::Write;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, error, warn};

/// Target platform for the generated script
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Platform {
    /// Batch script, `set` variables, MSBuild flags
    #[value(name = "Windows")]
    Windows,
    /// Bash script
    #[value(name = "Linux")]
    Linux,
    /// Bash script
    #[value(name = "Darwin")]
    Darwin,
}

impl Platform {
    /// Platform this binary was compiled for
    pub fn detect() -> Self {
        match std::env::consts::OS {
            "windows" => Platform::Windows,
            "macos" => Platform::Darwin,
            _ => Platform::Linux,
        }
    }

    /// Whether scripts are batch files
    pub fn is_windows(self) -> bool {
        matches!(self, Platform::Windows)
    }
}

/// Parallelism flag for the native build tool, if one is recognised
///
/// `has_tool` answers whether an executable is on PATH.
pub fn parallel_build_flags(
    platform: Platform,
    threads: usize,
    has_tool: impl Fn(&str) -> bool,
) -> Option<String> {
    debug!("Detected {} CPU threads for parallel builds.", threads);

    if platform.is_windows() && has_tool("msbuild") {
        return Some(format!("/m:{}", threads));
    }
    if has_tool("ninja") || has_tool("make") {
        return Some(format!("-j{}", threads));
    }

    warn!("Unknown or unsupported build system, no parallel flags applied.");
    None
}

/// Inputs for a configure-and-build script
#[derive(Debug, Clone)]
pub struct BuildPlan<'a> {
    /// Target platform
    pub platform: Platform,
    /// Compiler executable
    pub compiler: &'a Path,
    /// Build directory
    pub build_path: &'a Path,
    /// Source directory
    pub source_path: &'a Path,
    /// Extra CMake configure arguments
    pub cmake_args: &'a [String],
    /// Flags forwarded to the native build tool
    pub parallel_flags: Option<String>,
}

/// Render the script lines for a build plan
pub fn build_script(plan: &BuildPlan<'_>) -> Vec<String> {
    let compiler = plan.compiler.display();
    let build = plan.build_path.display();

    let mut lines = Vec::with_capacity(3);
    lines.push(if plan.platform.is_windows() {
        format!("set CXX={}", compiler)
    } else {
        format!("export CXX=\"{}\"", compiler)
    });

    let mut configure = vec![
        format!("-B\"{}\"", build),
        format!("-S\"{}\"", plan.source_path.display()),
        format!("-DCMAKE_CXX_COMPILER=\"{}\"", compiler),
    ];
    configure.extend(plan.cmake_args.iter().cloned());
    lines.push(format!("cmake {}", configure.join(" ")));

    let mut build_cmd = format!("cmake --build \"{}\"", build);
    if let Some(flags) = &plan.parallel_flags {
        build_cmd.push_str(" -- ");
        build_cmd.push_str(flags);
    }
    lines.push(build_cmd);

    lines
}

/// Write `lines` to a temporary script, run it, and stream its output
///
/// Returns the script's exit code (`-1` when it was killed by a signal).
pub async fn execute_script(lines: &[String], platform: Platform) -> Result<i32> {
    let (suffix, body) = if platform.is_windows() {
        (".bat", lines.join("\r\n"))
    } else {
        let mut all = vec!["#!/bin/bash".to_string(), "set -e".to_string()];
        all.extend(lines.iter().cloned());
        (".sh", all.join("\n"))
    };

    let mut script = tempfile::Builder::new()
        .prefix("toranj_build_")
        .suffix(suffix)
        .tempfile()
        .context("Failed to create temporary build script")?;
    script
        .write_all(body.as_bytes())
        .and_then(|_| script.flush())
        .context("Failed to write temporary build script")?;

    let mut cmd = if platform.is_windows() {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(script.path());
        cmd
    } else {
        let mut cmd = Command::new("bash");
        cmd.arg(script.path());
        cmd
    };

    let mut child = cmd
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .context("Failed to execute build script")?;

    if let Some(stdout) = child.stdout.take() {
        let mut output = BufReader::new(stdout).lines();
        while let Some(line) = output.next_line().await? {
            println!("{}", line);
        }
    }

    let status = child.wait().await.context("Build script did not finish")?;
    let code = status.code().unwrap_or(-1);
    if code == 0 {
        debug!("Build script finished with return code {}.", code);
    } else {
        error!("Build script failed with return code: {}", code);
    }
    Ok(code)
}
