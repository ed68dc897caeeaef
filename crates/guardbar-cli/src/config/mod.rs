//! Configuration management.

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use guardbar::{ConnectionSettings, EngineConfig, DEFAULT_PORT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// CLI configuration, stored as `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// AdGuard Home host name or IP address.
    pub host: Option<String>,

    /// Web interface port (default: 80).
    pub port: Option<u16>,

    /// Admin username.
    pub username: Option<String>,

    /// Admin password.
    pub password: Option<String>,

    /// Default output format.
    pub output_format: Option<OutputFormat>,

    /// Polling, settling and preset settings.
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Config {
    /// Get the config file path, honoring an explicit override.
    pub fn path(custom: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = custom {
            return Ok(path.to_path_buf());
        }

        let dirs = ProjectDirs::from("io", "guardbar", "guardbar")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    /// Connection settings from the file, with overrides applied on top
    #[must_use]
    pub fn connection_settings(&self, overrides: &ConnectionOverrides) -> ConnectionSettings {
        ConnectionSettings::new(
            overrides
                .host
                .clone()
                .or_else(|| self.host.clone())
                .unwrap_or_default(),
            overrides.port.or(self.port).unwrap_or(DEFAULT_PORT),
            overrides
                .username
                .clone()
                .or_else(|| self.username.clone())
                .unwrap_or_default(),
            overrides
                .password
                .clone()
                .or_else(|| self.password.clone())
                .unwrap_or_default(),
        )
    }
}

/// Connection values given as flags or environment variables.
#[derive(Debug, Clone, Default)]
pub struct ConnectionOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
}
