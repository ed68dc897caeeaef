//! Output formatting for different formats.

use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use guardbar::{EngineSnapshot, IconState};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text with colors
    #[default]
    Pretty,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => anyhow::bail!(
                "Unknown output format: {}\n\
                 Valid formats: pretty, json, yaml",
                s
            ),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Print a value as JSON or YAML. Returns false for [`OutputFormat::Pretty`]
/// so the caller can render text instead.
pub fn print_structured<T: Serialize>(format: OutputFormat, value: &T) -> anyhow::Result<bool> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
        OutputFormat::Pretty => return Ok(false),
    }
    Ok(true)
}

/// Color a piece of text the way the icon would show it
pub fn paint(icon: IconState, text: &str) -> ColoredString {
    match icon {
        IconState::Loading => text.dimmed(),
        IconState::Error => text.red().bold(),
        IconState::TimerActive => text.yellow().bold(),
        IconState::ProtectionOn => text.green().bold(),
        IconState::ProtectionOff => text.red(),
    }
}

/// One-line header: icon label and status line
pub fn header(snapshot: &EngineSnapshot) -> String {
    let icon = snapshot.reconciled.icon;
    format!(
        "{} {}",
        paint(icon, &format!("[{}]", icon.label())),
        snapshot.status_line().bold()
    )
}

/// Full human-readable rendering of a snapshot
pub fn print_snapshot(snapshot: &EngineSnapshot) {
    println!("{}", header(snapshot));

    if let Some(stats) = &snapshot.stats {
        println!();
        println!("  {} {}", "Queries Today:".bold(), group_digits(stats.num_dns_queries));
        println!(
            "  {} {}",
            "Blocked Today:".bold(),
            group_digits(stats.num_blocked_filtering)
        );
        println!("  {} {:.1}%", "Block Rate:".bold(), stats.block_percentage());
        println!(
            "  {} {:.1} ms",
            "Avg Processing:".bold(),
            stats.avg_processing_ms()
        );
    }

    if let Some(status) = &snapshot.status {
        println!();
        if let Some(version) = &status.version {
            println!("  {} {}", "Version:".bold(), version);
        }
        if !status.dns_addresses.is_empty() {
            println!("  {} {}", "DNS:".bold(), status.dns_addresses.join(", "));
        }
        if !status.running {
            println!("  {}", "DNS server is not running".yellow());
        }
    }

    if let Some(error) = &snapshot.error {
        println!();
        println!("{} {}", "Error:".red().bold(), error);
    }
}

/// Format a count with thousands separators, e.g. `5,678`
pub fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(5678), "5,678");
        assert_eq!(group_digits(1_234_567), "1,234,567");
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("YAML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!("yml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert!("csv".parse::<OutputFormat>().is_err());
    }
}
