use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

use crate::build::Platform;
use crate::output::OutputFormat;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages (default)
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Parser)]
#[command(name = "toranj")]
#[command(about = "toranj - build, sweep and compare transpiled parallel benchmarks")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    /// If not specified, uses RUST_LOG or defaults to 'info'
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/toranj/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run benchmark binaries across thread counts and problem sizes
    ///
    /// Each binary is run over the thread ladder 1, 2, 4, ... up to the largest
    /// power of two not above --max-threads, for every parameter value. One
    /// line per cell is printed and, with --log, appended to a file.
    Sweep(SweepArgs),

    /// Compare result logs (old vs new, or reference vs C++ variant)
    Compare(CompareArgs),

    /// Configure and build the project with CMake
    Build(BuildArgs),

    /// List the C++ compilers found on this system
    Toolchain,

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Debug, Clone, clap::Args)]
pub struct SweepArgs {
    /// Benchmark executables to sweep, in order
    #[arg(required = true, value_name = "BINARY")]
    pub binaries: Vec<PathBuf>,

    /// Problem sizes (comma separated); throughput binaries only use the count
    #[arg(short, long, value_delimiter = ',')]
    pub params: Vec<u64>,

    /// Maximum thread count (defaults to config, then the number of CPUs)
    #[arg(short = 't', long)]
    pub max_threads: Option<u32>,

    /// Append result lines to this file
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Per-run timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Fewest repetitions per cell
    #[arg(long)]
    pub min_runs: Option<u32>,

    /// Repetitions for mid-sized workloads
    #[arg(long)]
    pub base_runs: Option<u32>,

    /// Most repetitions per cell
    #[arg(long)]
    pub max_runs: Option<u32>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct CompareArgs {
    /// Old results (file path or http(s) URL)
    pub old: String,

    /// New results (file path or http(s) URL)
    pub new: Option<String>,

    /// Prefix for written chart series files
    #[arg(short, long)]
    pub output_prefix: Option<String>,

    /// Drop every binary whose name contains "chapel"
    #[arg(long)]
    pub ignore_chapel: bool,

    /// Keep only binaries matching this regular expression
    #[arg(long)]
    pub pattern: Option<String>,

    /// Compare {BASE}_chapel against its C++ variant instead of old vs new
    #[arg(long, value_name = "BASE")]
    pub compare_variant: Option<String>,

    /// Also emit series normalized by the overall maximum
    #[arg(long)]
    pub raw_line: bool,

    /// Accept six-field throughput lines
    #[arg(long)]
    pub include_throughput: bool,

    /// Table output format
    #[arg(short = 'f', long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, clap::Args)]
pub struct BuildArgs {
    /// Select a specific compiler to use
    #[arg(long, value_parser = ["g++", "clang++", "cl", "c++"])]
    pub cxx: Option<String>,

    /// Build directory (created if missing)
    #[arg(long)]
    pub build_path: Option<PathBuf>,

    /// Source directory
    #[arg(long)]
    pub source_path: Option<PathBuf>,

    /// Only print the generated build script
    #[arg(long)]
    pub dry_run: bool,

    /// Override the detected platform
    #[arg(long, value_enum)]
    pub platform: Option<Platform>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Initialize a new config file
    Init {
        /// Path for the config file (defaults to ~/.config/toranj/config.toml)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite existing config file
        #[arg(short = 'F', long)]
        force: bool,
    },

    /// Show the current effective configuration
    Show {
        /// Output format (toml, json)
        #[arg(short, long, default_value = "toml")]
        format: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_sweep_params_list() {
        let cli = Cli::parse_from([
            "toranj", "sweep", "bin/heat_cpp", "bin/heat_chapel", "--params", "100,1000", "-t", "8",
        ]);
        let Commands::Sweep(args) = cli.command else {
            panic!("expected sweep");
        };
        assert_eq!(args.binaries.len(), 2);
        assert_eq!(args.params, vec![100, 1000]);
        assert_eq!(args.max_threads, Some(8));
    }

    #[test]
    fn parses_variant_compare() {
        let cli = Cli::parse_from([
            "toranj",
            "compare",
            "old.txt",
            "--compare-variant",
            "stream",
            "--raw-line",
            "-v",
        ]);
        assert!(cli.verbose);
        let Commands::Compare(args) = cli.command else {
            panic!("expected compare");
        };
        assert_eq!(args.compare_variant.as_deref(), Some("stream"));
        assert!(args.new.is_none());
        assert!(args.raw_line);
        assert_eq!(args.format, OutputFormat::Table);
    }

    #[test]
    fn rejects_unknown_compiler() {
        assert!(Cli::try_parse_from(["toranj", "build", "--cxx", "icc"]).is_err());
    }
}
