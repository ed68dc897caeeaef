//! Typed change notifications broadcast to engine subscribers.

use guardbar_core::IconState;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Capacity of the change-notification channel
pub const EVENT_CAPACITY: usize = 64;

/// Change notifications published by the engine.
///
/// Events carry only what changed. Subscribers read the rest through
/// [`Reconciler::snapshot`](crate::Reconciler::snapshot).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A refresh completed and status, stats or error changed
    DataUpdated,
    /// The derived icon changed
    IconStateChanged { icon: IconState },
    /// Countdown update for the armed re-enable timer
    TimerTick { remaining_seconds: f64 },
}

pub(crate) fn channel() -> broadcast::Sender<EngineEvent> {
    broadcast::channel(EVENT_CAPACITY).0
}
