//! Reconciliation engine for GuardBar.
//!
//! The engine keeps a status indicator consistent with AdGuard Home while
//! the user toggles protection, a scheduled re-enable counts down, and
//! background polling races both:
//!
//! - **State**: a pure reducer ([`EngineState`]) over [`Signal`]s, deriving
//!   the [`ReconciledState`] the indicator shows
//! - **Timer**: the one-shot [`ReenableTimer`] with a 1 Hz countdown
//! - **Poller**: the periodic refresh loop ([`Poller`])
//! - **Reconciler**: the [`Reconciler`] handle tying them to a
//!   [`RemoteStateClient`](guardbar_core::RemoteStateClient) and
//!   publishing [`EngineEvent`]s
//!
//! # Example
//!
//! ```rust,ignore
//! use guardbar_core::ConnectionSettings;
//! use guardbar_engine::{EngineConfig, EngineEvent, Reconciler};
//!
//! let settings = ConnectionSettings::new("192.168.1.2", 80, "admin", "secret");
//! let engine = Reconciler::from_settings(&settings, EngineConfig::default())?;
//! let mut events = engine.subscribe();
//! engine.start();
//!
//! while let Ok(event) = events.recv().await {
//!     if let EngineEvent::IconStateChanged { icon } = event {
//!         println!("{icon}: {}", engine.snapshot().status_line());
//!     }
//! }
//! ```

mod config;
mod events;
mod poller;
mod reconciler;
mod state;
mod timer;

pub use config::{EngineConfig, POLLING_INTERVAL_CHOICES};
pub use events::{EngineEvent, EVENT_CAPACITY};
pub use poller::Poller;
pub use reconciler::Reconciler;
pub use state::{
    EngineSnapshot, EngineState, FetchTicket, Prediction, ProtectionView, ReconciledState,
    Signal, TimerId, ToggleId,
};
pub use timer::{ArmedTimer, NoticeFn, ReenableTimer, TimerNotice, TICK_INTERVAL};

pub use guardbar_core::{GuardError, Result};
