//! Sidecast CLI - Command-line interface
//!
//! Drives stream parsing, episode resolution and handover decisions against
//! local JSON files.

mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sidecast_core::SidecastConfig;
use sidecast_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "sidecast")]
#[command(about = "Second-screen stream handover toolkit")]
struct Cli {
    /// Console log level
    #[arg(long, global = true, value_enum, default_value_t = CliLogLevel::Warn)]
    log_level: CliLogLevel,

    /// JSON configuration file; environment overrides still apply
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_level.as_tracing_level(), None)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let config = load_config(cli.config.as_deref()).await?;
    commands::handle_command(cli.command, &config).await
}

async fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<SidecastConfig> {
    let Some(path) = path else {
        return Ok(SidecastConfig::from_env());
    };

    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading config {}", path.display()))?;
    let mut config: SidecastConfig = serde_json::from_str(&json)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.apply_env_overrides();

    tracing::debug!(path = %path.display(), "Loaded configuration file");
    Ok(config)
}
