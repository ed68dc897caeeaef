//! guardbar - AdGuard Home status from the terminal
//!
//! Shows, toggles and temporarily pauses AdGuard Home protection.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    guardbar_cli::run().await
}
