use anyhow::{bail, Context, Result};
use tracing::info;

use crate::build::{build_script, execute_script, parallel_build_flags, BuildPlan, Platform};
use crate::cli::BuildArgs;
use crate::config::CliConfig;
use crate::toolchain::{compiler_version, find_compilers, on_path, select};

/// Configure and build with CMake, returning the build's exit code
pub async fn execute(args: BuildArgs, config: &CliConfig) -> Result<i32> {
    let compilers = find_compilers();
    let compiler = match (select(&compilers, args.cxx.as_deref()), args.cxx.as_deref()) {
        (Some(compiler), _) => compiler,
        (None, Some(name)) => bail!("Selected compiler '{}' not found on this system", name),
        (None, None) => bail!("No C++ compilers found. Set CXX or install g++, clang++, cl or c++"),
    };
    info!(
        "Using compiler {} ({})",
        compiler.name,
        compiler_version(compiler).await
    );

    let build_path = args.build_path.unwrap_or_else(|| config.build.build_path.clone());
    let source_path = args
        .source_path
        .unwrap_or_else(|| config.build.source_path.clone());

    if !source_path.is_dir() {
        bail!("Source path does not exist: {}", source_path.display());
    }

    let platform = args.platform.unwrap_or_else(Platform::detect);
    let plan = BuildPlan {
        platform,
        compiler: &compiler.path,
        build_path: &build_path,
        source_path: &source_path,
        cmake_args: &config.build.cmake_args,
        parallel_flags: parallel_build_flags(platform, num_cpus::get(), on_path),
    };
    let script = build_script(&plan);

    if args.dry_run {
        for line in &script {
            println!("{}", line);
        }
        return Ok(0);
    }

    if !build_path.exists() {
        std::fs::create_dir_all(&build_path).with_context(|| {
            format!("Failed to create build directory: {}", build_path.display())
        })?;
        info!("Created build directory: {}", build_path.display());
    }

    execute_script(&script, platform).await
}
