//! [`RemoteStateClient`] for the HTTP client.

use async_trait::async_trait;
use guardbar_core::{ProtectionStatus, RemoteStateClient, Result, Stats};

use crate::AdGuardClient;

#[async_trait]
impl RemoteStateClient for AdGuardClient {
    async fn fetch_status(&self) -> Result<ProtectionStatus> {
        self.protection().status().await
    }

    async fn fetch_stats(&self) -> Result<Stats> {
        self.stats().summary().await
    }

    async fn set_protection(&self, enabled: bool) -> Result<()> {
        self.protection().set_enabled(enabled).await
    }
}
