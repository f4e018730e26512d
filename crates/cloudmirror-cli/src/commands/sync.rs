//! Sync command
//!
//! Wires a provider adapter, the progress log, and a cancellation token
//! (hooked to Ctrl-C) into one `SyncRun`, executes it, and renders the
//! report. CLI flags override their config-file counterparts.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::info;

use cloudmirror_core::config::{read_token, Config};
use cloudmirror_core::ports::logger::{ProgressLog, StdoutSink, TracingSink};
use cloudmirror_core::ports::provider::CloudProvider;
use cloudmirror_core::retry::{FixedBackoff, NoRetry, RetryPolicy};
use cloudmirror_core::{LocalAction, RemoteAction, RunConfig};
use cloudmirror_engine::SyncRun;

use crate::output::{get_formatter, OutputFormat};

/// Supported cloud backends
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ProviderKind {
    Onedrive,
    Dropbox,
    Gdrive,
}

#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Cloud provider to sync against
    #[arg(long, value_enum)]
    pub provider: ProviderKind,

    /// Local directory to reconcile (overrides config)
    #[arg(long)]
    pub local_path: Option<PathBuf>,

    /// Remote root folder, relative to the provider root (overrides config)
    #[arg(long)]
    pub remote_path: Option<String>,

    /// Action for items that exist only locally
    #[arg(long)]
    pub on_local_only: Option<LocalAction>,

    /// Action for items that exist only remotely
    #[arg(long)]
    pub on_remote_only: Option<RemoteAction>,

    /// Show what would be done without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Bearer token file (overrides the configured one)
    #[arg(long)]
    pub token_file: Option<PathBuf>,
}

impl SyncCommand {
    pub async fn execute(&self, config_path: Option<&Path>, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);

        let config_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(Config::default_path);
        let config = Config::load_or_default(&config_path)?;
        info!(config_path = %config_path.display(), "Loaded configuration");

        let Some(local_path) = self.local_path.clone().or(config.sync.local_path.clone()) else {
            formatter.error("No local path given. Pass --local-path or set sync.local_path.");
            return Ok(());
        };
        let remote_path = self
            .remote_path
            .clone()
            .unwrap_or_else(|| config.sync.remote_path.clone());
        let dry_run = self.dry_run || config.sync.dry_run;

        let run_config = RunConfig::new(
            local_path,
            remote_path,
            dry_run,
            self.on_local_only.unwrap_or(config.sync.on_local_only),
            self.on_remote_only.unwrap_or(config.sync.on_remote_only),
        );

        let provider = self.build_provider(&config)?;

        if dry_run {
            formatter.info("Dry run mode - no changes will be made");
        }

        // Ctrl-C requests cooperative cancellation; the run stops at the
        // next item boundary.
        let cancel = CancellationToken::new();
        let signal_token = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, cancelling sync");
                signal_token.cancel();
            }
        });

        let sink: Box<dyn cloudmirror_core::ports::logger::LogSink> = match format {
            OutputFormat::Human => Box::new(StdoutSink),
            OutputFormat::Json => Box::new(TracingSink),
        };
        let retry: Box<dyn RetryPolicy> = if config.sync.retry_attempts > 1 {
            Box::new(FixedBackoff::new(
                config.sync.retry_attempts,
                Duration::from_secs(config.sync.retry_delay_secs),
            ))
        } else {
            Box::new(NoRetry)
        };

        let report = SyncRun::new(provider, run_config, ProgressLog::new(sink), cancel)
            .with_retry_policy(retry)
            .execute()
            .await?;

        formatter.report(&report, dry_run);
        Ok(())
    }

    fn build_provider(&self, config: &Config) -> Result<Arc<dyn CloudProvider>> {
        Ok(match self.provider {
            ProviderKind::Onedrive => {
                let mut credentials = config.providers.onedrive.clone();
                if let Some(path) = &self.token_file {
                    credentials.token_file = Some(path.clone());
                }
                let token = read_token(&credentials, "onedrive")?;
                Arc::new(cloudmirror_onedrive::OneDriveProvider::new(
                    cloudmirror_onedrive::GraphClient::new(token),
                ))
            }
            ProviderKind::Dropbox => {
                let mut credentials = config.providers.dropbox.clone();
                if let Some(path) = &self.token_file {
                    credentials.token_file = Some(path.clone());
                }
                let token = read_token(&credentials, "dropbox")?;
                Arc::new(cloudmirror_dropbox::DropboxProvider::new(
                    cloudmirror_dropbox::DropboxClient::new(token),
                ))
            }
            ProviderKind::Gdrive => {
                let mut credentials = config.providers.gdrive.clone();
                if let Some(path) = &self.token_file {
                    credentials.token_file = Some(path.clone());
                }
                let token = read_token(&credentials, "gdrive")?;
                Arc::new(cloudmirror_gdrive::GDriveProvider::new(
                    cloudmirror_gdrive::DriveClient::new(token),
                ))
            }
        })
    }
}

