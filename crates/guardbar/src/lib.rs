//! Keep an AdGuard Home status indicator consistent with the server.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use guardbar::{ConnectionSettings, EngineConfig, Reconciler};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> guardbar::Result<()> {
//!     let settings = ConnectionSettings::new("192.168.1.2", 80, "admin", "secret");
//!     let engine = Reconciler::from_settings(&settings, EngineConfig::default())?;
//!
//!     engine.refresh().await;
//!     println!("{}", engine.snapshot().status_line());
//!
//!     // Pause blocking for five minutes; it comes back on its own
//!     engine.disable_for_duration(Duration::from_secs(300)).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

// Re-export core types
pub use guardbar_core::*;

// Re-export client
pub use guardbar_client::{connect, AdGuardClient, AdGuardClientBuilder, DemoClient};

// Re-export engine
pub use guardbar_engine::{
    EngineConfig, EngineEvent, EngineSnapshot, ProtectionView, ReconciledState, Reconciler,
    POLLING_INTERVAL_CHOICES,
};

/// Lower-level engine building blocks
pub mod engine {
    pub use guardbar_engine::*;
}

// Re-export runtime for convenience
pub use serde;
pub use serde_json;
pub use tokio;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_demo_settings_drive_the_engine() {
        let settings = ConnectionSettings::new("localhost", 80, "demo", "testing");
        let engine = Reconciler::from_settings(&settings, EngineConfig::default()).unwrap();

        engine.refresh().await;
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.reconciled.icon, IconState::ProtectionOn);
        assert_eq!(
            snapshot.status.as_ref().and_then(|s| s.version.as_deref()),
            Some("v0.107.52")
        );
        assert_eq!(snapshot.status_line(), "Ad Blocking: ON");
    }
}
