//! Config command
//!
//! Inspects and bootstraps the YAML configuration file.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;

use cloudmirror_core::config::Config;

use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the active configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write a default configuration file if none exists
    Init,
}

impl ConfigCommand {
    pub async fn execute(&self, config_path: Option<&Path>, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(Config::default_path);

        match self {
            Self::Show => {
                let config = Config::load_or_default(&path)?;
                if matches!(format, OutputFormat::Json) {
                    formatter.print_json(&serde_json::to_value(&config)?);
                } else {
                    let yaml =
                        serde_yaml::to_string(&config).context("failed to render configuration")?;
                    print!("{yaml}");
                }
            }
            Self::Path => {
                println!("{}", path.display());
            }
            Self::Init => {
                if path.exists() {
                    formatter.warn(&format!("{} already exists, leaving it alone", path.display()));
                    return Ok(());
                }
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                let yaml = serde_yaml::to_string(&Config::default())
                    .context("failed to render default configuration")?;
                tokio::fs::write(&path, yaml).await?;
                formatter.success(&format!("Wrote {}", path.display()));
            }
        }
        Ok(())
    }
}
