//! `guardbar watch` - Poll and print changes until interrupted.

use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use guardbar::{EngineEvent, EngineSnapshot};
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use super::Context;
use crate::cli::args::WatchArgs;
use crate::output::{group_digits, header, OutputFormat};

/// Interval used when polling is switched off in the config file
const FALLBACK_INTERVAL_SECS: u64 = 30;

pub async fn execute(ctx: Context, args: WatchArgs) -> Result<()> {
    let interval = args
        .interval
        .or_else(|| {
            ctx.engine_config
                .effective_polling_interval()
                .map(|d| d.as_secs())
        })
        .unwrap_or(FALLBACK_INTERVAL_SECS);
    if interval == 0 {
        anyhow::bail!("Polling interval must be greater than zero");
    }

    let engine = ctx.engine()?;
    let mut events = engine.subscribe();
    engine.start_polling(interval);

    if ctx.output_format == OutputFormat::Pretty {
        println!(
            "{}",
            format!(
                "Watching {} every {interval}s (Ctrl-C to stop)",
                ctx.settings.base_url()
            )
            .dimmed()
        );
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(EngineEvent::IconStateChanged { .. }) => {
                    if ctx.output_format == OutputFormat::Pretty {
                        println!("{} {}", timestamp(), header(&engine.snapshot()));
                    }
                }
                Ok(EngineEvent::DataUpdated) => print_update(&ctx, &engine.snapshot())?,
                Ok(EngineEvent::TimerTick { .. }) => {}
                Err(RecvError::Lagged(missed)) => debug!(missed, "watch output fell behind"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    engine.stop_polling();
    Ok(())
}

fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string().dimmed().to_string()
}

fn print_update(ctx: &Context, snapshot: &EngineSnapshot) -> Result<()> {
    match ctx.output_format {
        // One document per refresh so the stream can be piped
        OutputFormat::Json => println!("{}", serde_json::to_string(snapshot)?),
        OutputFormat::Yaml => print!("---\n{}", serde_yaml::to_string(snapshot)?),
        OutputFormat::Pretty => {
            if !ctx.verbose {
                return Ok(());
            }
            if let Some(stats) = &snapshot.stats {
                println!(
                    "{} {} queries, {} blocked ({:.1}%)",
                    timestamp(),
                    group_digits(stats.num_dns_queries),
                    group_digits(stats.num_blocked_filtering),
                    stats.block_percentage()
                );
            }
            if let Some(error) = &snapshot.error {
                println!("{} {} {}", timestamp(), "Error:".red().bold(), error);
            }
        }
    }
    Ok(())
}
