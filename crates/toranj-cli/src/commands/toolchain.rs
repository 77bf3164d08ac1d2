use anyhow::{bail, Result};
use colored::Colorize;

use crate::toolchain::{compiler_version, find_compilers};

/// List the compilers found on this system with their versions
pub async fn execute() -> Result<()> {
    let compilers = find_compilers();
    if compilers.is_empty() {
        bail!("No C++ compilers found. Set CXX or install one of g++, clang++, cl, c++");
    }

    println!("{}", "Available C++ compilers:".bold());
    for compiler in &compilers {
        let version = compiler_version(compiler).await;
        println!(
            "  {} {} ({})",
            compiler.name.green(),
            compiler.path.display(),
            version.dimmed()
        );
    }

    Ok(())
}
