//! CloudMirror CLI
//!
//! Provides commands for:
//! - Running a sync between a local folder and a cloud provider
//! - Viewing and initializing configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{config::ConfigCommand, sync::SyncCommand};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "cloudmirror",
    version,
    about = "Mirror a local folder against OneDrive, Dropbox, or Google Drive"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Synchronize a local folder with a cloud provider
    Sync(SyncCommand),
    /// View and manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(cloudmirror_core::config::Config::default_path);
    let logging = cloudmirror_core::config::Config::load_or_default(&config_path)
        .map(|c| c.logging)
        .unwrap_or_default();

    // Setup tracing: -v flags override the configured level
    let filter = match cli.verbose {
        0 => logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);
    if cli.json || logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    match cli.command {
        Commands::Sync(cmd) => cmd.execute(cli.config.as_deref(), format).await,
        Commands::Config(cmd) => cmd.execute(cli.config.as_deref(), format).await,
    }
}
