//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, ConnectionOverrides};
use crate::output::OutputFormat;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Load configuration
    let config_path = Config::path(cli.config.as_deref())?;
    let config = Config::load(&config_path)?;

    // Determine output format
    let output_format = cli
        .output
        .or(config.output_format)
        .unwrap_or(OutputFormat::Pretty);

    // Flags and environment override the file
    let overrides = ConnectionOverrides {
        host: cli.host,
        port: cli.port,
        username: cli.username,
        password: cli.password,
    };

    // Create context for commands
    let ctx = commands::Context {
        settings: config.connection_settings(&overrides),
        engine_config: config.engine.clone(),
        config_path,
        output_format,
        verbose: cli.verbose,
    };

    // Dispatch to appropriate command
    match cli.command {
        Commands::Status => commands::status::execute(ctx).await,
        Commands::Enable => commands::toggle::enable(ctx).await,
        Commands::Disable(args) => commands::toggle::disable(ctx, args).await,
        Commands::Watch(args) => commands::watch::execute(ctx, args).await,
        Commands::Presets => commands::presets::execute(&ctx),
        Commands::Test => commands::test::execute(ctx).await,
        Commands::Config(args) => commands::config::execute(&ctx, args),
    }
}

/// Log to stderr. `RUST_LOG` wins; `--verbose` raises the default to debug.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "guardbar=debug,guardbar_engine=debug,guardbar_client=debug,guardbar_cli=debug"
    } else {
        "error"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();
}
