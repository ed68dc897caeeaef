//! `guardbar presets` - The "disable for" presets.

use anyhow::Result;
use colored::Colorize;
use guardbar::{format_remaining, DisablePreset};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use super::Context;
use crate::output::print_structured;

#[derive(Serialize, Tabled)]
struct PresetRow {
    #[tabled(rename = "Preset")]
    label: &'static str,
    #[tabled(rename = "Duration")]
    #[serde(skip)]
    duration: String,
    #[tabled(skip)]
    seconds: u64,
    #[tabled(rename = "Enabled")]
    enabled: bool,
}

fn rows(ctx: &Context) -> Vec<PresetRow> {
    DisablePreset::ALL
        .into_iter()
        .map(|preset| {
            let seconds = preset.duration().as_secs();
            #[allow(clippy::cast_precision_loss)]
            let duration = format_remaining(seconds as f64);
            PresetRow {
                label: preset.label(),
                duration,
                seconds,
                enabled: ctx.engine_config.enabled_presets.contains(&preset),
            }
        })
        .collect()
}

pub fn execute(ctx: &Context) -> Result<()> {
    let rows = rows(ctx);

    if print_structured(ctx.output_format, &rows)? {
        return Ok(());
    }

    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!();
    println!(
        "{}",
        "Tip: guardbar disable --for \"5 minutes\" (or any duration such as 90s, 45m, 2h)".dimmed()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use guardbar::{ConnectionSettings, EngineConfig};

    #[test]
    fn test_rows_follow_config() {
        let mut engine_config = EngineConfig::default();
        engine_config.enabled_presets.insert(DisablePreset::TwoHours);
        let ctx = Context {
            settings: ConnectionSettings::default(),
            engine_config,
            config_path: "config.toml".into(),
            output_format: OutputFormat::Pretty,
            verbose: false,
        };

        let rows = rows(&ctx);
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[1].duration, "1m 0s");
        assert!(rows[7].enabled);
        assert!(!rows[3].enabled);
    }
}
