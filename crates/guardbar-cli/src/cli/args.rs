//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// AdGuard Home status from the terminal
///
/// Check whether ad blocking is on, flip it, or pause it for a while and let
/// it come back on its own.
///
/// Try it without a server: --host localhost --username demo --password testing
#[derive(Parser, Debug)]
#[command(name = "guardbar")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// AdGuard Home host name or IP address
    #[arg(long, env = "GUARDBAR_HOST", global = true)]
    pub host: Option<String>,

    /// AdGuard Home web interface port
    #[arg(long, env = "GUARDBAR_PORT", global = true)]
    pub port: Option<u16>,

    /// Admin username
    #[arg(short = 'u', long, env = "GUARDBAR_USERNAME", global = true)]
    pub username: Option<String>,

    /// Admin password
    #[arg(short = 'p', long, env = "GUARDBAR_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Configuration file to use instead of the default location
    #[arg(long, env = "GUARDBAR_CONFIG", global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Show debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show protection status and query statistics
    Status,

    /// Turn protection on, cancelling any pending re-enable
    Enable,

    /// Turn protection off, indefinitely or for a while
    Disable(DisableArgs),

    /// Poll and print every change until interrupted
    Watch(WatchArgs),

    /// List the "disable for" presets
    Presets,

    /// Check that the server is reachable and accepts the credentials
    Test,

    /// Manage CLI configuration
    Config(ConfigArgs),
}

// ============================================================================
// Disable command
// ============================================================================

#[derive(Args, Debug)]
pub struct DisableArgs {
    /// Re-enable after this long: a preset ("5 minutes") or a duration
    /// ("90s", "5m", "2h")
    #[arg(long = "for", value_name = "DURATION")]
    pub duration: Option<String>,
}

// ============================================================================
// Watch command
// ============================================================================

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Seconds between refreshes (defaults to the configured interval)
    #[arg(short, long, value_name = "SECS")]
    pub interval: Option<u64>,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (host, port, username, password, output_format,
        /// polling_enabled, polling_interval, settling_delay_ms, presets)
        key: String,

        /// Value to set
        value: String,
    },

    /// Show configuration file path
    Path,
}
