//! Core types and traits for the GuardBar status engine.
//!
//! This crate provides the foundational types used across the GuardBar crates:
//!
//! - **Types**: Strongly-typed representations of the AdGuard Home responses
//!   the engine consumes, plus the icon, timer and preset vocabulary
//! - **Errors**: Error handling with [`GuardError`] and its [`ErrorKind`]
//! - **Contract**: The [`RemoteStateClient`] trait the engine drives
//!
//! # Example
//!
//! ```rust,ignore
//! use guardbar_core::{RemoteStateClient, Result};
//!
//! async fn print_rate(client: &dyn RemoteStateClient) -> Result<()> {
//!     let stats = client.fetch_stats().await?;
//!     println!("Blocked: {:.1}%", stats.block_percentage());
//!     Ok(())
//! }
//! ```

mod error;
mod remote;
pub mod types;

pub use error::{ErrorKind, GuardError, Result};
pub use remote::RemoteStateClient;
pub use types::*;
