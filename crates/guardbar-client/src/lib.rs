//! HTTP client for the AdGuard Home control API.
//!
//! This crate provides [`AdGuardClient`] for talking to AdGuard Home, the
//! offline [`DemoClient`], and [`connect`] which picks between them.

mod client;
mod demo;
mod remote;
pub mod api;

use std::sync::Arc;

use guardbar_core::{ConnectionSettings, RemoteStateClient};
use tracing::info;

pub use client::{AdGuardClient, AdGuardClientBuilder};
pub use demo::DemoClient;
pub use guardbar_core::{GuardError, Result};

/// Build the remote client for a set of connection settings.
///
/// Fails with [`GuardError::NotConfigured`] before touching the network if
/// host, username or password is missing. The demo credentials select
/// [`DemoClient`].
pub fn connect(settings: &ConnectionSettings) -> Result<Arc<dyn RemoteStateClient>> {
    settings.require_configured()?;

    if settings.is_demo() {
        info!("demo credentials detected, using offline client");
        return Ok(Arc::new(DemoClient::new()));
    }

    let client = AdGuardClient::new(settings)?;
    info!(base_url = client.base_url(), "connecting to AdGuard Home");
    Ok(Arc::new(client))
}
