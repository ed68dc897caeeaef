//! `guardbar status` - Protection status and query statistics.

use anyhow::Result;

use super::Context;
use crate::output::{print_snapshot, print_structured};

pub async fn execute(ctx: Context) -> Result<()> {
    let engine = ctx.engine()?;
    engine.refresh().await;
    let snapshot = engine.snapshot();

    if !print_structured(ctx.output_format, &snapshot)? {
        print_snapshot(&snapshot);
    }

    // Exit non-zero when nothing could be fetched
    if snapshot.status.is_none() {
        let message = snapshot
            .error
            .unwrap_or_else(|| "no status received".to_string());
        anyhow::bail!("Could not fetch status: {message}");
    }

    Ok(())
}
