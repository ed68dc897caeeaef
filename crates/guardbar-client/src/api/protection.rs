//! Protection status and toggle endpoints.

use crate::AdGuardClient;
use guardbar_core::{ProtectionStatus, Result};
use serde::Serialize;
use tracing::instrument;

/// Request body for `/control/dns_config`
#[derive(Debug, Serialize)]
struct DnsConfigUpdate {
    protection_enabled: bool,
}

/// Protection API endpoints
pub struct ProtectionApi<'a> {
    client: &'a AdGuardClient,
}

impl<'a> ProtectionApi<'a> {
    pub(crate) const fn new(client: &'a AdGuardClient) -> Self {
        Self { client }
    }

    /// Get the server status, including whether protection is on
    #[instrument(skip(self))]
    pub async fn status(&self) -> Result<ProtectionStatus> {
        self.client.get("/control/status").await
    }

    /// Turn protection on or off.
    ///
    /// The server applies the change asynchronously; a status read right
    /// after this returns may still show the previous value.
    #[instrument(skip(self))]
    pub async fn set_enabled(&self, enabled: bool) -> Result<()> {
        self.client
            .post_empty(
                "/control/dns_config",
                &DnsConfigUpdate {
                    protection_enabled: enabled,
                },
            )
            .await
    }
}
