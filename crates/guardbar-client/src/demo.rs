//! Offline client used with the demo credentials.

use async_trait::async_trait;
use guardbar_core::{ProtectionStatus, RemoteStateClient, Result, Stats};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

const DEMO_VERSION: &str = "v0.107.52";

/// In-memory stand-in for AdGuard Home.
///
/// Serves fixed statistics and remembers the last protection toggle, so the
/// whole engine can be exercised without a server.
#[derive(Debug)]
pub struct DemoClient {
    protection_enabled: AtomicBool,
}

impl Default for DemoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoClient {
    /// Create a demo client with protection on
    #[must_use]
    pub const fn new() -> Self {
        Self {
            protection_enabled: AtomicBool::new(true),
        }
    }

    fn status(&self) -> ProtectionStatus {
        ProtectionStatus {
            protection_enabled: self.protection_enabled.load(Ordering::SeqCst),
            running: true,
            version: Some(DEMO_VERSION.to_string()),
            dns_addresses: vec!["127.0.0.1:53".to_string(), "[::1]:53".to_string()],
        }
    }
}

#[async_trait]
impl RemoteStateClient for DemoClient {
    async fn fetch_status(&self) -> Result<ProtectionStatus> {
        Ok(self.status())
    }

    async fn fetch_stats(&self) -> Result<Stats> {
        Ok(Stats {
            num_dns_queries: 5678,
            num_blocked_filtering: 1234,
            num_replaced_safebrowsing: 12,
            avg_processing_time: 0.042,
        })
    }

    async fn set_protection(&self, enabled: bool) -> Result<()> {
        debug!(enabled, "demo protection toggle");
        self.protection_enabled.store(enabled, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_toggle_round_trip() {
        let client = DemoClient::new();
        assert!(client.fetch_status().await.unwrap().protection_enabled);

        client.set_protection(false).await.unwrap();
        let status = client.fetch_status().await.unwrap();
        assert!(!status.protection_enabled);
        assert_eq!(status.version.as_deref(), Some(DEMO_VERSION));
        assert_eq!(status.dns_addresses.len(), 2);
    }

    #[tokio::test]
    async fn test_demo_stats() {
        let stats = DemoClient::new().fetch_stats().await.unwrap();
        assert_eq!(stats.num_dns_queries, 5678);
        assert!((stats.block_percentage() - 21.73).abs() < 0.01);
    }
}
