//! `guardbar enable` and `guardbar disable` - Protection toggles.

use std::time::Duration;

use anyhow::{Context as _, Result};
use colored::Colorize;
use guardbar::engine::TICK_INTERVAL;
use guardbar::{format_remaining, parse_duration, DisablePreset, EngineEvent, Reconciler};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::broadcast::error::RecvError;
use tokio::time;

use super::Context;
use crate::cli::args::DisableArgs;
use crate::output::{header, print_structured, OutputFormat};

pub async fn enable(ctx: Context) -> Result<()> {
    let engine = ctx.engine()?;
    engine
        .enable_now()
        .await
        .context("Failed to enable protection")?;
    report(&ctx, &engine)
}

pub async fn disable(ctx: Context, args: DisableArgs) -> Result<()> {
    // Validate before touching the server
    let duration = args
        .duration
        .as_deref()
        .map(parse_disable_duration)
        .transpose()?;

    let engine = ctx.engine()?;
    match duration {
        Some(duration) => disable_for(&ctx, &engine, duration).await,
        None => {
            engine
                .disable_permanently()
                .await
                .context("Failed to disable protection")?;
            report(&ctx, &engine)
        }
    }
}

/// A preset label ("5 minutes") or a compact duration ("90s", "5m", "2h")
fn parse_disable_duration(input: &str) -> Result<Duration> {
    let duration = input
        .parse::<DisablePreset>()
        .map(DisablePreset::duration)
        .or_else(|_| parse_duration(input))?;
    Ok(duration)
}

async fn disable_for(ctx: &Context, engine: &Reconciler, duration: Duration) -> Result<()> {
    let mut events = engine.subscribe();
    engine
        .disable_for_duration(duration)
        .await
        .context("Failed to disable protection")?;

    if ctx.output_format == OutputFormat::Pretty {
        println!("{}", header(&engine.snapshot()));
    }
    let bar = countdown_bar(ctx.output_format, duration);

    while engine.is_timer_active() {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                bar.finish_and_clear();
                eprintln!("{}", "Interrupted: re-enabling protection now.".yellow());
                engine
                    .enable_now()
                    .await
                    .context("Failed to re-enable protection")?;
                break;
            }
            event = events.recv() => match event {
                Ok(EngineEvent::TimerTick { remaining_seconds }) => {
                    bar.set_position(elapsed_secs(duration, remaining_seconds));
                    bar.set_message(format_remaining(remaining_seconds));
                }
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            },
            // A cleared timer with an unchanged icon publishes nothing
            () = time::sleep(TICK_INTERVAL) => {}
        }
    }
    bar.finish_and_clear();

    // A suppressed re-enable failure leaves a prediction behind; ask the server
    engine.refresh().await;
    let snapshot = engine.snapshot();
    if !snapshot.reconciled.effective_protection_on {
        let reason = snapshot
            .last_failure
            .unwrap_or_else(|| "server still reports protection off".to_string());
        anyhow::bail!("Protection was not re-enabled: {reason}");
    }

    report(ctx, engine)
}

fn countdown_bar(format: OutputFormat, duration: Duration) -> ProgressBar {
    if format != OutputFormat::Pretty {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(duration.as_secs());
    bar.set_style(
        ProgressStyle::with_template("{spinner:.yellow} Re-enabling in {msg:>7} [{bar:30.yellow/dim}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar.set_message(format_remaining(duration.as_secs_f64()));
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn elapsed_secs(total: Duration, remaining_seconds: f64) -> u64 {
    (total.as_secs_f64() - remaining_seconds).max(0.0) as u64
}

fn report(ctx: &Context, engine: &Reconciler) -> Result<()> {
    let snapshot = engine.snapshot();
    if !print_structured(ctx.output_format, &snapshot)? {
        println!("{}", header(&snapshot));
    }
    Ok(())
}
