use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use toranj_cli::{
    cli::{Cli, Commands},
    commands, config,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // --log-level wins, then --verbose, then RUST_LOG, then info for our crates
    let explicit = cli
        .log_level
        .map(LevelFilter::from)
        .or(cli.verbose.then_some(LevelFilter::DEBUG));
    let env_filter = match explicit {
        Some(level) => EnvFilter::new(format!("toranj_cli={},toranj_core={}", level, level)),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("toranj_cli=info,toranj_core=info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = config::CliConfig::load(cli.config)?;
    debug!("Effective configuration: {:?}", config);

    match cli.command {
        Commands::Sweep(args) => commands::sweep::execute(args, &config).await?,
        Commands::Compare(args) => commands::compare::execute(args, &config).await?,
        Commands::Build(args) => {
            let code = commands::build::execute(args, &config).await?;
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::Toolchain => commands::toolchain::execute().await?,
        Commands::Config(cmd) => commands::config::execute(cmd, &config).await?,
    }

    Ok(())
}
