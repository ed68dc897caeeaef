//! Command implementations.

pub mod config;
pub mod presets;
pub mod status;
pub mod toggle;
pub mod watch;

use std::path::PathBuf;

use guardbar::{ConnectionSettings, EngineConfig, Reconciler};

use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Connection settings after flags, environment and file are merged
    pub settings: ConnectionSettings,

    /// Engine tuning from the config file
    pub engine_config: EngineConfig,

    /// Config file in use
    pub config_path: PathBuf,

    /// Output format
    pub output_format: OutputFormat,

    /// Verbose output
    pub verbose: bool,
}

impl Context {
    /// Fail with setup instructions unless the connection is configured.
    pub fn require_configured(&self) -> anyhow::Result<&ConnectionSettings> {
        if self.settings.is_configured() {
            return Ok(&self.settings);
        }
        anyhow::bail!(
            "AdGuard Home connection is not configured (missing {}).\n\n\
             Set it with one of:\n  \
             1. --host, --username and --password\n  \
             2. GUARDBAR_HOST, GUARDBAR_USERNAME and GUARDBAR_PASSWORD environment variables\n  \
             3. guardbar config set host <HOST> (then username and password)\n\n\
             Try it without a server: --username demo --password testing",
            self.settings.missing_fields().join(", ")
        )
    }

    /// Create the engine for the configured connection.
    pub fn engine(&self) -> anyhow::Result<Reconciler> {
        let settings = self.require_configured()?;
        Ok(Reconciler::from_settings(settings, self.engine_config.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(settings: ConnectionSettings) -> Context {
        Context {
            settings,
            engine_config: EngineConfig::default(),
            config_path: PathBuf::from("config.toml"),
            output_format: OutputFormat::Pretty,
            verbose: false,
        }
    }

    #[test]
    fn test_unconfigured_explains_setup() {
        let ctx = context(ConnectionSettings::new("adguard.lan", 80, "admin", ""));
        let err = ctx.engine().unwrap_err().to_string();
        assert!(err.contains("missing password"));
        assert!(err.contains("GUARDBAR_PASSWORD"));
    }

    #[test]
    fn test_demo_engine() {
        let ctx = context(ConnectionSettings::new("localhost", 80, "demo", "testing"));
        assert!(ctx.engine().is_ok());
    }
}
