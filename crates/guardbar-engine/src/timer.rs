//! One-shot re-enable timer with a once-per-second countdown.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use guardbar_core::{GuardError, Result, TimerState};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::state::TimerId;

/// Countdown resolution
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Progress reported by an armed timer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerNotice {
    /// Seconds left until the action fires
    Tick { id: TimerId, remaining_seconds: f64 },
    /// The action ran to completion, or failed, and the timer is gone
    Cleared { id: TimerId },
}

/// Callback receiving [`TimerNotice`]s
pub type NoticeFn = Arc<dyn Fn(TimerNotice) + Send + Sync>;

/// Handle describing a freshly armed timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmedTimer {
    /// Identifier used by notices
    pub id: TimerId,
    /// Wall-clock fire time
    pub end_time: DateTime<Utc>,
    /// Requested duration
    pub duration: Duration,
    /// Timer that was cancelled to make room for this one
    pub replaced: Option<TimerId>,
}

struct Armed {
    id: TimerId,
    ends_at: Instant,
    end_time: DateTime<Utc>,
    token: CancellationToken,
}

#[derive(Default)]
struct Slot {
    last_id: TimerId,
    armed: Option<Armed>,
}

/// A single re-enable slot. Arming replaces whatever was armed before.
#[derive(Clone, Default)]
pub struct ReenableTimer {
    slot: Arc<Mutex<Slot>>,
}

impl std::fmt::Debug for ReenableTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReenableTimer")
            .field("armed", &self.armed_id())
            .finish()
    }
}

impl ReenableTimer {
    /// Create an idle timer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Arm the timer to run `action` once after `duration`.
    ///
    /// Any previously armed timer is cancelled first. `notify` receives a
    /// tick right away and then once per second, and a final
    /// [`TimerNotice::Cleared`] after the action has completed. It is never
    /// called while the timer's own lock is held.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn arm<A, Fut>(&self, duration: Duration, action: A, notify: NoticeFn) -> Result<ArmedTimer>
    where
        A: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if duration.is_zero() {
            return Err(GuardError::InvalidArgument(
                "re-enable duration must be greater than zero".to_string(),
            ));
        }

        let end_time = Utc::now()
            + chrono::Duration::from_std(duration)
                .map_err(|e| GuardError::InvalidArgument(format!("duration out of range: {e}")))?;
        let ends_at = Instant::now() + duration;
        let token = CancellationToken::new();

        let (id, replaced) = {
            let mut slot = self.lock();
            let replaced = slot.armed.take().map(|previous| {
                previous.token.cancel();
                previous.id
            });
            slot.last_id += 1;
            let id = slot.last_id;
            slot.armed = Some(Armed {
                id,
                ends_at,
                end_time,
                token: token.clone(),
            });
            (id, replaced)
        };

        if let Some(previous) = replaced {
            debug!(previous, id, "replacing armed re-enable timer");
        }
        info!(id, secs = duration.as_secs(), %end_time, "re-enable timer armed");

        tokio::spawn(run_countdown(id, ends_at, token.clone(), notify.clone()));
        tokio::spawn(run_delayed(
            Arc::clone(&self.slot),
            id,
            duration,
            token,
            action,
            notify,
        ));

        Ok(ArmedTimer {
            id,
            end_time,
            duration,
            replaced,
        })
    }

    /// Cancel the armed timer, returning its id.
    ///
    /// An action that has not started yet will not run. An action that
    /// already started is left to finish.
    pub fn cancel(&self) -> Option<TimerId> {
        let armed = self.lock().armed.take()?;
        armed.token.cancel();
        info!(id = armed.id, "re-enable timer cancelled");
        Some(armed.id)
    }

    /// Whether a timer is armed
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.lock().armed.is_some()
    }

    /// Id of the armed timer
    #[must_use]
    pub fn armed_id(&self) -> Option<TimerId> {
        self.lock().armed.as_ref().map(|a| a.id)
    }

    /// Current countdown, computed from the clock
    #[must_use]
    pub fn state(&self) -> TimerState {
        self.lock()
            .armed
            .as_ref()
            .map_or_else(TimerState::inactive, |armed| TimerState {
                active: true,
                end_time: Some(armed.end_time),
                remaining_seconds: remaining_until(armed.ends_at),
            })
    }
}

fn remaining_until(ends_at: Instant) -> f64 {
    ends_at
        .saturating_duration_since(Instant::now())
        .as_secs_f64()
}

async fn run_countdown(id: TimerId, ends_at: Instant, token: CancellationToken, notify: NoticeFn) {
    let mut ticker = time::interval(TICK_INTERVAL);
    loop {
        tokio::select! {
            biased;
            () = token.cancelled() => break,
            _ = ticker.tick() => {
                let remaining_seconds = remaining_until(ends_at);
                notify(TimerNotice::Tick { id, remaining_seconds });
                if remaining_seconds <= 0.0 {
                    break;
                }
            }
        }
    }
}

async fn run_delayed<A, Fut>(
    slot: Arc<Mutex<Slot>>,
    id: TimerId,
    duration: Duration,
    token: CancellationToken,
    action: A,
    notify: NoticeFn,
) where
    A: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::select! {
        biased;
        () = token.cancelled() => {
            debug!(id, "re-enable timer cancelled before firing");
            return;
        }
        () = time::sleep(duration) => {}
    }

    // Cancellation may have raced the wakeup
    let still_armed = slot
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .armed
        .as_ref()
        .is_some_and(|a| a.id == id);
    if !still_armed {
        debug!(id, "re-enable timer replaced before firing");
        return;
    }

    info!(id, "re-enable timer fired");
    // Spawned so a panicking action still reaches the cleanup below
    if let Err(e) = tokio::spawn(action()).await {
        warn!(id, error = %e, "re-enable action did not complete");
    }

    // First writer wins: cancel or re-arm may already have cleared the slot
    let cleared = {
        let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.armed.as_ref().is_some_and(|a| a.id == id) {
            if let Some(armed) = slot.armed.take() {
                armed.token.cancel();
            }
            true
        } else {
            false
        }
    };

    if cleared {
        notify(TimerNotice::Cleared { id });
    }
}
