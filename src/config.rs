use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::auth::AuthFlow;
use crate::error::{GmailError, Result};
use crate::models::CollectionMode;

/// Largest page the Gmail list endpoint will return
pub const MAX_RESULTS_LIMIT: u32 = 500;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_credentials")]
    pub credentials: PathBuf,
    #[serde(default = "default_token_cache")]
    pub token_cache: PathBuf,
    #[serde(default)]
    pub flow: AuthFlow,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            credentials: default_credentials(),
            token_cache: default_token_cache(),
            flow: AuthFlow::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default)]
    pub mode: CollectionMode,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            max_results: default_max_results(),
            mode: CollectionMode::default(),
        }
    }
}

fn default_credentials() -> PathBuf {
    PathBuf::from("credentials.json")
}

fn default_token_cache() -> PathBuf {
    PathBuf::from("token.json")
}

fn default_output() -> PathBuf {
    PathBuf::from("pipe.json")
}

fn default_max_results() -> u32 {
    9
}

impl Config {
    pub async fn load(path: &Path) -> Result<Self> {
        // If file doesn't exist, return default config with warning
        if !path.exists() {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GmailError::SettingsError(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| GmailError::SettingsError(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;

        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.export.max_results == 0 {
            return Err(GmailError::SettingsError(
                "export.max_results must be at least 1".to_string(),
            ));
        }
        if self.export.max_results > MAX_RESULTS_LIMIT {
            return Err(GmailError::SettingsError(format!(
                "export.max_results cannot exceed {}",
                MAX_RESULTS_LIMIT
            )));
        }

        if self.export.output.as_os_str().is_empty() {
            return Err(GmailError::SettingsError(
                "export.output cannot be empty".to_string(),
            ));
        }
        if self.auth.credentials.as_os_str().is_empty() {
            return Err(GmailError::SettingsError(
                "auth.credentials cannot be empty".to_string(),
            ));
        }
        if self.auth.token_cache.as_os_str().is_empty() {
            return Err(GmailError::SettingsError(
                "auth.token_cache cannot be empty".to_string(),
            ));
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}
