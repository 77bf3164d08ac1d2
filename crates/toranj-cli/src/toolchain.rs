//! C++ compiler discovery

use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, error};

/// Compilers searched for on PATH, in preference order (`cl` is MSVC)
pub const COMMON_COMPILERS: [&str; 4] = ["g++", "clang++", "cl", "c++"];

/// A compiler found on this system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiler {
    /// Name it was looked up by
    pub name: String,
    /// Resolved executable path
    pub path: PathBuf,
}

/// Find available compilers: `$CXX` first, then [`COMMON_COMPILERS`]
pub fn find_compilers() -> Vec<Compiler> {
    let cxx = std::env::var("CXX").ok();
    find_compilers_with(cxx.as_deref(), |name| which::which(name).ok())
}

/// Compiler discovery with an injectable PATH lookup
///
/// Each name appears once, at the position it was first found.
pub fn find_compilers_with(
    cxx: Option<&str>,
    lookup: impl Fn(&str) -> Option<PathBuf>,
) -> Vec<Compiler> {
    debug!("Searching for available C++ compilers...");
    let mut found: Vec<Compiler> = Vec::new();

    let candidates = cxx
        .filter(|c| !c.is_empty())
        .into_iter()
        .chain(COMMON_COMPILERS);
    for name in candidates {
        let Some(path) = lookup(name) else {
            continue;
        };
        debug!("Found compiler: {} -> {}", name, path.display());
        match found.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.path = path,
            None => found.push(Compiler {
                name: name.to_string(),
                path,
            }),
        }
    }

    found
}

/// First line of the compiler's version banner
///
/// MSVC prints its banner on stderr when run without arguments; everything
/// else answers `--version` on stdout.
pub async fn compiler_version(compiler: &Compiler) -> String {
    let is_msvc = compiler.name == "cl";
    let mut cmd = Command::new(&compiler.path);
    if !is_msvc {
        cmd.arg("--version");
    }

    match cmd.output().await {
        Ok(output) => {
            let stream = if is_msvc {
                &output.stderr
            } else {
                &output.stdout
            };
            first_line(&String::from_utf8_lossy(stream))
                .unwrap_or_else(|| "Version info not available".to_string())
        }
        Err(e) => {
            error!("Error retrieving version for {}: {}", compiler.name, e);
            format!("Error retrieving version: {}", e)
        }
    }
}

fn first_line(text: &str) -> Option<String> {
    text.lines().next().map(|l| l.trim().to_string())
}

/// Pick the requested compiler, or the first one found
pub fn select<'a>(compilers: &'a [Compiler], requested: Option<&str>) -> Option<&'a Compiler> {
    match requested {
        Some(name) => compilers.iter().find(|c| c.name == name),
        None => compilers.first(),
    }
}

/// True when `tool` resolves on PATH
pub fn on_path(tool: &str) -> bool {
    which::which(tool).is_ok()
}
