//! `guardbar config` - CLI configuration management.

use anyhow::Result;
use colored::Colorize;
use guardbar::{DisablePreset, POLLING_INTERVAL_CHOICES};
use std::collections::BTreeSet;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;
use crate::output::{print_structured, OutputFormat};

pub fn execute(ctx: &Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(ctx),
        ConfigCommands::Set { key, value } => set_config(ctx, &key, &value),
        ConfigCommands::Path => show_path(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let mut config = Config::load(&ctx.config_path)?;
    if config.password.is_some() {
        config.password = Some("********".to_string());
    }

    if print_structured(ctx.output_format, &config)? {
        return Ok(());
    }

    let unset = || "(not set)".dimmed().to_string();

    println!("{}", "Current Configuration:".bold());
    println!();
    println!("  {} {}", "host:".bold(), config.host.unwrap_or_else(unset));
    println!(
        "  {} {}",
        "port:".bold(),
        config.port.map_or_else(unset, |p| p.to_string())
    );
    println!("  {} {}", "username:".bold(), config.username.unwrap_or_else(unset));
    println!("  {} {}", "password:".bold(), config.password.unwrap_or_else(unset));
    println!(
        "  {} {}",
        "output_format:".bold(),
        config.output_format.unwrap_or(OutputFormat::Pretty)
    );

    let engine = &config.engine;
    println!("  {} {}", "polling_enabled:".bold(), engine.polling_enabled);
    println!("  {} {}s", "polling_interval:".bold(), engine.polling_interval_secs);
    println!("  {} {}ms", "settling_delay_ms:".bold(), engine.settling_delay_ms);
    println!(
        "  {} {}",
        "presets:".bold(),
        engine
            .presets()
            .map(DisablePreset::label)
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(())
}

fn set_config(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let mut config = Config::load(&ctx.config_path)?;

    match key {
        "host" => {
            config.host = Some(value.trim().to_string());
            println!("{} host set to {}.", "Success:".green().bold(), value.cyan());
        }
        "port" => {
            config.port = Some(value.parse()?);
            println!("{} port set to {}.", "Success:".green().bold(), value.cyan());
        }
        "username" | "user" => {
            config.username = Some(value.to_string());
            println!("{} username set.", "Success:".green().bold());
        }
        "password" => {
            config.password = Some(value.to_string());
            println!("{} password set.", "Success:".green().bold());
        }
        "output_format" | "output" => {
            config.output_format = Some(value.parse()?);
            println!("{} Output format set to {}.", "Success:".green().bold(), value.cyan());
        }
        "polling_enabled" | "polling" => {
            config.engine.polling_enabled = value.parse()?;
            println!("{} polling_enabled set to {}.", "Success:".green().bold(), value);
        }
        "polling_interval" | "polling_interval_secs" => {
            let secs: u64 = value.trim_end_matches('s').parse()?;
            if secs == 0 {
                anyhow::bail!("Polling interval must be greater than zero");
            }
            if !POLLING_INTERVAL_CHOICES.contains(&secs) {
                println!(
                    "{}",
                    format!("Note: the usual choices are {POLLING_INTERVAL_CHOICES:?} seconds").dimmed()
                );
            }
            config.engine.polling_interval_secs = secs;
            println!("{} polling_interval set to {}s.", "Success:".green().bold(), secs);
        }
        "settling_delay_ms" | "settling_delay" => {
            config.engine.settling_delay_ms = value.parse()?;
            println!("{} settling_delay_ms set to {}.", "Success:".green().bold(), value);
        }
        "presets" | "enabled_presets" => {
            let presets = value
                .split(',')
                .map(str::parse::<DisablePreset>)
                .collect::<Result<BTreeSet<_>, _>>()?;
            if presets.is_empty() {
                anyhow::bail!("At least one preset is required");
            }
            config.engine.enabled_presets = presets;
            println!("{} presets updated.", "Success:".green().bold());
        }
        _ => {
            anyhow::bail!(
                "Unknown config key: {}\n\n\
                 Available keys:\n  \
                 host              - AdGuard Home host name or IP\n  \
                 port              - Web interface port (default 80)\n  \
                 username          - Admin username\n  \
                 password          - Admin password\n  \
                 output_format     - Default output format (pretty/json/yaml)\n  \
                 polling_enabled   - Refresh periodically in watch mode (true/false)\n  \
                 polling_interval  - Seconds between refreshes (15, 30, 60, 120, 300)\n  \
                 settling_delay_ms - Wait after a toggle before re-checking\n  \
                 presets           - Comma-separated presets (e.g. \"30 seconds,5m,1 hour\")",
                key
            );
        }
    }

    config.save(&ctx.config_path)?;

    Ok(())
}

fn show_path(ctx: &Context) -> Result<()> {
    println!("{}", ctx.config_path.display());
    Ok(())
}
