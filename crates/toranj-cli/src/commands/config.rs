use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::cli::ConfigCommands;
use crate::config::CliConfig;

/// Execute config subcommand
pub async fn execute(cmd: ConfigCommands, config: &CliConfig) -> Result<()> {
    match cmd {
        ConfigCommands::Init { path, force } => init(path, force).await,
        ConfigCommands::Show { format } => show(config, &format).await,
    }
}

/// Initialize a new config file
async fn init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = match path {
        Some(path) => path,
        None => CliConfig::default_config_path().context("Could not determine config file path")?,
    };

    if config_path.exists() && !force {
        println!(
            "{} Config file already exists at: {}",
            "Error:".red().bold(),
            config_path.display()
        );
        println!("Use {} to overwrite", "--force".yellow());
        return Ok(());
    }

    CliConfig::create_example(&config_path)?;

    println!(
        "{} Created config file at: {}",
        "Success:".green().bold(),
        config_path.display()
    );
    println!(
        "\n{}",
        "Edit this file to set thread limits, run counts and build flags.".dimmed()
    );

    Ok(())
}

/// Show the effective configuration (file and environment applied)
async fn show(config: &CliConfig, format: &str) -> Result<()> {
    let rendered = match format {
        "json" => config.display_as_json()?,
        "toml" => config.display_as_toml()?,
        other => bail!("Unknown config format '{}', expected toml or json", other),
    };
    println!("{}", rendered);
    Ok(())
}
