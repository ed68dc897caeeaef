//! Statistics endpoints.

use crate::AdGuardClient;
use guardbar_core::{Result, Stats};
use tracing::instrument;

/// Statistics API endpoints
pub struct StatsApi<'a> {
    client: &'a AdGuardClient,
}

impl<'a> StatsApi<'a> {
    pub(crate) const fn new(client: &'a AdGuardClient) -> Self {
        Self { client }
    }

    /// Get the query statistics summary for the configured stats window
    #[instrument(skip(self))]
    pub async fn summary(&self) -> Result<Stats> {
        self.client.get("/control/stats").await
    }
}
