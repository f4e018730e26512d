//! Application configuration
//!
//! Loaded from a YAML file (default `~/.config/cloudmirror/config.yaml`).
//! Every section has defaults so a missing or partial file still yields a
//! usable configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::actions::{LocalAction, RemoteAction};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sync behaviour defaults
    pub sync: SyncConfig,
    /// Per-provider credentials
    pub providers: ProvidersConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Default sync behaviour, overridable per invocation on the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Local directory to reconcile
    pub local_path: Option<PathBuf>,
    /// Remote root folder, relative to the provider root
    pub remote_path: String,
    /// Action for items that exist only locally
    pub on_local_only: LocalAction,
    /// Action for items that exist only remotely
    pub on_remote_only: RemoteAction,
    /// Simulate all mutating actions
    pub dry_run: bool,
    /// Attempts per mutating call (1 = no retries)
    pub retry_attempts: u32,
    /// Seconds to wait between retry attempts
    pub retry_delay_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            local_path: None,
            remote_path: String::new(),
            on_local_only: LocalAction::Upload,
            on_remote_only: RemoteAction::Download,
            dry_run: false,
            retry_attempts: 1,
            retry_delay_secs: 2,
        }
    }
}

/// Credentials for each supported backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub onedrive: ProviderCredentials,
    pub dropbox: ProviderCredentials,
    pub gdrive: ProviderCredentials,
}

/// Where a provider's bearer token comes from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderCredentials {
    /// File containing the bearer token (first line, trimmed)
    pub token_file: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter ("error", "warn", "info", "debug", "trace")
    pub level: String,
    /// Emit JSON log lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    /// Loads configuration from the given YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config {}: {e}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("failed to parse config {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Loads the config file if it exists, otherwise returns defaults
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Default configuration file location
    /// (`$XDG_CONFIG_HOME/cloudmirror/config.yaml`)
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cloudmirror")
            .join("config.yaml")
    }
}

/// Reads a bearer token from the configured token file
pub fn read_token(credentials: &ProviderCredentials, provider: &str) -> anyhow::Result<String> {
    let path = credentials.token_file.as_ref().ok_or_else(|| {
        anyhow::anyhow!("no token_file configured for provider '{provider}'")
    })?;
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read token file {}: {e}", path.display()))?;
    let token = raw.lines().next().unwrap_or("").trim().to_string();
    if token.is_empty() {
        anyhow::bail!("token file {} is empty", path.display());
    }
    Ok(token)
}
