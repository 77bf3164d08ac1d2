use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use toranj_core::sweep::{ProfileRules, RunCountPolicy};

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Sweep settings
    #[serde(default)]
    pub sweep: SweepConfig,
    /// Binary classification and invocation conventions
    #[serde(default)]
    pub binary: ProfileRules,
    /// Comparison report settings
    #[serde(default)]
    pub compare: CompareConfig,
    /// Build orchestration settings
    #[serde(default)]
    pub build: BuildConfig,
}

/// Sweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Maximum thread count (number of CPUs when unset)
    pub max_threads: Option<u32>,
    /// Parameter values used when none are given on the command line
    pub params: Vec<u64>,
    /// Per-run timeout in seconds
    pub timeout_secs: u64,
    /// Fewest repetitions per cell
    pub min_runs: u32,
    /// Repetitions for mid-sized workloads
    pub base_runs: u32,
    /// Most repetitions per cell
    pub max_runs: u32,
}

/// Comparison configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Prefix for chart series files
    pub output_prefix: String,
    /// Accept six-field throughput lines
    pub include_throughput: bool,
}

/// Build configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Build directory, relative paths resolve against the working directory
    pub build_path: PathBuf,
    /// Source directory
    pub source_path: PathBuf,
    /// Extra arguments passed to the CMake configure step
    pub cmake_args: Vec<String>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        let policy = RunCountPolicy::default();
        Self {
            max_threads: None,
            params: vec![1000, 10000, 100000],
            timeout_secs: 600,
            min_runs: policy.min_runs(),
            base_runs: policy.base_runs(),
            max_runs: policy.max_runs(),
        }
    }
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            output_prefix: "comparison".to_string(),
            include_throughput: false,
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            build_path: PathBuf::from("build"),
            source_path: PathBuf::from("."),
            cmake_args: default_cmake_args(),
        }
    }
}

fn default_cmake_args() -> Vec<String> {
    [
        "-DCHPLX_WITH_FETCH_FMT=ON",
        "-DCHPLX_WITH_FETCH_HPX=ON",
        "-DHPX_WITH_FETCH_ASIO=ON",
        "-DHPX_WITH_FETCH_BOOST=ON",
        "-DHPX_WITH_FETCH_HWLOC=ON",
        "-DCHPLX_WITH_EXAMPLES=OFF",
        "-DCHPLX_WITH_TESTS=OFF",
        "-DCMAKE_BUILD_TYPE=Release",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl CliConfig {
    /// Load configuration with precedence: defaults < file < env
    ///
    /// Command-line arguments are applied by each command on top of this.
    pub fn load(config_file: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::from_file_or_default(config_file)?;

        if let Ok(threads) = std::env::var("TORANJ_MAX_THREADS") {
            config.sweep.max_threads = Some(
                threads
                    .parse()
                    .with_context(|| format!("Invalid TORANJ_MAX_THREADS: {}", threads))?,
            );
        }
        if let Ok(timeout) = std::env::var("TORANJ_TIMEOUT_SECS") {
            config.sweep.timeout_secs = timeout
                .parse()
                .with_context(|| format!("Invalid TORANJ_TIMEOUT_SECS: {}", timeout))?;
        }

        Ok(config)
    }

    /// Resolved maximum thread count
    pub fn max_threads(&self) -> u32 {
        self.sweep
            .max_threads
            .unwrap_or_else(|| num_cpus::get().max(1) as u32)
    }

    /// Per-run timeout, `override_secs` taking precedence; zero is rejected
    pub fn timeout(&self, override_secs: Option<u64>) -> Result<Duration> {
        match override_secs.unwrap_or(self.sweep.timeout_secs) {
            0 => bail!("Per-run timeout must be at least 1 second"),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Run-count policy from the configured bounds, with per-field overrides
    pub fn run_policy(
        &self,
        min_runs: Option<u32>,
        base_runs: Option<u32>,
        max_runs: Option<u32>,
    ) -> Result<RunCountPolicy> {
        RunCountPolicy::new(
            min_runs.unwrap_or(self.sweep.min_runs),
            base_runs.unwrap_or(self.sweep.base_runs),
            max_runs.unwrap_or(self.sweep.max_runs),
        )
        .context("Invalid run-count settings")
    }

    /// Get default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("TORANJ_CONFIG_DIR") {
            return Ok(PathBuf::from(dir).join("config.toml"));
        }
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("toranj");
        Ok(config_dir.join("config.toml"))
    }

    /// Create a new config file with example values
    pub fn create_example(path: &Path) -> Result<()> {
        let example = r#"# toranj Configuration
# Location: ~/.config/toranj/config.toml

[sweep]
# Maximum thread count; the ladder is 1, 2, 4, ... up to the largest power
# of two not above this value. Default: number of CPUs
# max_threads = 16

# Problem sizes used when --params is not given
params = [1000, 10000, 100000]

# Per-run timeout in seconds (env: TORANJ_TIMEOUT_SECS)
timeout_secs = 600

# Repetitions per cell: workloads (param x threads) below 10,000 get max_runs,
# 10,000,000 and above get min_runs, base_runs is halved per decade between.
min_runs = 2
base_runs = 8
max_runs = 10

[binary]
# Case-insensitive name markers
throughput_marker = "gups"
env_thread_marker = "chapel"

# How threads and parameters are passed
thread_flag = "--hpx:threads="
thread_env_var = "CHPL_RT_NUM_THREADS_PER_LOCALE"
size_flag = "--nx="
mem_ratio_flag = "--memRatio="

# 0-indexed fields of the benchmark's CSV output
size_time_field = 6
throughput_time_field = 1
throughput_value_field = 2

[compare]
output_prefix = "comparison"
include_throughput = false

[build]
build_path = "build"
source_path = "."
cmake_args = [
    "-DCHPLX_WITH_FETCH_FMT=ON",
    "-DCHPLX_WITH_FETCH_HPX=ON",
    "-DHPX_WITH_FETCH_ASIO=ON",
    "-DHPX_WITH_FETCH_BOOST=ON",
    "-DHPX_WITH_FETCH_HWLOC=ON",
    "-DCHPLX_WITH_EXAMPLES=OFF",
    "-DCHPLX_WITH_TESTS=OFF",
    "-DCMAKE_BUILD_TYPE=Release",
]
"#;

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        std::fs::write(path, example).context("Failed to write config file")?;

        Ok(())
    }

    /// Load config from file or return default
    fn from_file_or_default(config_file: Option<PathBuf>) -> Result<Self> {
        // Test mode skips the user's config unless a file is named explicitly
        if config_file.is_none() && std::env::var("TORANJ_TEST_MODE").is_ok() {
            return Ok(Self::default());
        }

        let path = config_file
            .or_else(|| Self::default_config_path().ok())
            .filter(|p| p.exists());

        if let Some(path) = path {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Display the current configuration as TOML
    pub fn display_as_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config as TOML")
    }

    /// Display the current configuration as JSON
    pub fn display_as_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize config as JSON")
    }
}
