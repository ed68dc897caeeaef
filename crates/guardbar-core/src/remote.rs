//! The contract between the engine and whatever talks to AdGuard Home.

use async_trait::async_trait;

use crate::{ProtectionStatus, Result, Stats};

/// Remote operations the engine depends on.
///
/// Implementations must bound every call with a timeout and report it as an
/// error; the engine never waits on a call indefinitely.
///
/// After a successful [`set_protection`](Self::set_protection) the server
/// applies the change asynchronously. A status read issued right after the
/// write may still report the old value, so callers re-fetch after a short
/// settling delay.
#[async_trait]
pub trait RemoteStateClient: Send + Sync {
    /// Fetch the current protection status
    async fn fetch_status(&self) -> Result<ProtectionStatus>;

    /// Fetch the query statistics summary
    async fn fetch_stats(&self) -> Result<Stats>;

    /// Turn protection on or off
    async fn set_protection(&self, enabled: bool) -> Result<()>;
}
