//! The reconciliation engine.
//!
//! [`Reconciler`] owns the raw state, drives the remote client, and turns
//! network results, user toggles and timer progress into reducer signals.
//! Every signal is applied under one lock together with the events it
//! produces, so subscribers observe changes in the order they happened.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use guardbar_core::{
    ConnectionSettings, GuardError, ProtectionStatus, RemoteStateClient, Result, Stats,
};
use tokio::sync::broadcast;
use tokio::time;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::events::{self, EngineEvent};
use crate::poller::Poller;
use crate::state::{EngineSnapshot, EngineState, FetchTicket, Signal, TimerId, ToggleId};
use crate::timer::{NoticeFn, ReenableTimer, TimerNotice};

/// Handle to the engine. Cheap to clone; all clones share one state.
#[derive(Clone)]
pub struct Reconciler {
    inner: Arc<Inner>,
}

struct Shared {
    state: EngineState,
    icon: guardbar_core::IconState,
}

struct Inner {
    client: Arc<dyn RemoteStateClient>,
    shared: Mutex<Shared>,
    config: Mutex<EngineConfig>,
    events: broadcast::Sender<EngineEvent>,
    timer: ReenableTimer,
    poller: Poller,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn config(&self) -> MutexGuard<'_, EngineConfig> {
        self.config.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a signal and publish the icon change it causes, if any
    fn commit(&self, shared: &mut Shared, signal: Signal) -> bool {
        let applied = shared.state.apply(signal);
        let icon = shared.state.reconcile().icon;
        if icon != shared.icon {
            debug!(from = %shared.icon, to = %icon, "icon state changed");
            shared.icon = icon;
            self.publish(EngineEvent::IconStateChanged { icon });
        }
        applied
    }

    fn signal(&self, signal: Signal) -> bool {
        let mut shared = self.lock();
        self.commit(&mut shared, signal)
    }

    fn publish(&self, event: EngineEvent) {
        // No subscribers is not an error
        let _ = self.events.send(event);
    }

    fn on_timer_notice(&self, notice: TimerNotice) {
        let mut shared = self.lock();
        match notice {
            TimerNotice::Tick {
                id,
                remaining_seconds,
            } => {
                if self.commit(
                    &mut shared,
                    Signal::TimerTicked {
                        id,
                        remaining_seconds,
                    },
                ) {
                    self.publish(EngineEvent::TimerTick { remaining_seconds });
                }
            }
            TimerNotice::Cleared { id } => {
                if self.commit(&mut shared, Signal::TimerCleared { id }) {
                    debug!(id, "re-enable timer cleared");
                }
            }
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.timer.cancel();
    }
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("poller", &self.inner.poller)
            .field("timer", &self.inner.timer)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    /// Create an engine around a remote client. Nothing runs until
    /// [`start`](Self::start) or an operation is called.
    pub fn new(client: Arc<dyn RemoteStateClient>, config: EngineConfig) -> Self {
        let state = EngineState::new();
        let icon = state.reconcile().icon;
        Self {
            inner: Arc::new(Inner {
                client,
                shared: Mutex::new(Shared { state, icon }),
                config: Mutex::new(config),
                events: events::channel(),
                timer: ReenableTimer::new(),
                poller: Poller::new(),
            }),
        }
    }

    /// Create an engine for the given connection settings.
    ///
    /// Fails with [`GuardError::NotConfigured`] without any network call if
    /// host, username or password is missing.
    pub fn from_settings(settings: &ConnectionSettings, config: EngineConfig) -> Result<Self> {
        let client = guardbar_client::connect(settings)?;
        Ok(Self::new(client, config))
    }

    /// Start polling if the configuration enables it
    pub fn start(&self) -> bool {
        let interval = self.inner.config().effective_polling_interval();
        match interval {
            Some(interval) => self.poll_every(interval),
            None => {
                debug!("polling disabled by configuration");
                false
            }
        }
    }

    /// Subscribe to change notifications
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.inner.events.subscribe()
    }

    /// Consistent copy of the current state
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        self.inner.lock().state.snapshot()
    }

    /// Current engine configuration
    #[must_use]
    pub fn config(&self) -> EngineConfig {
        self.inner.config().clone()
    }

    /// Replace the configuration, restarting or stopping polling when the
    /// polling settings changed.
    pub fn apply_config(&self, config: EngineConfig) {
        let previous = std::mem::replace(&mut *self.inner.config(), config.clone());
        if !config.polling_changed(&previous) {
            return;
        }
        info!(
            enabled = config.polling_enabled,
            interval_secs = config.polling_interval_secs,
            "polling settings changed"
        );
        match config.effective_polling_interval() {
            Some(interval) => {
                self.poll_every(interval);
            }
            None => {
                self.stop_polling();
            }
        }
    }

    /// Fetch status and stats once and merge the results
    pub async fn refresh(&self) {
        let ticket = self.begin_fetch();
        debug!(ticket, "refresh started");

        let status = self.inner.client.fetch_status().await;
        let stats = self.inner.client.fetch_stats().await;

        self.finish_fetch(ticket, status, stats);
    }

    fn begin_fetch(&self) -> FetchTicket {
        let mut shared = self.inner.lock();
        let ticket = shared.state.next_ticket();
        self.inner
            .commit(&mut shared, Signal::FetchStarted { ticket });
        ticket
    }

    fn finish_fetch(&self, ticket: FetchTicket, status: Result<ProtectionStatus>, stats: Result<Stats>) {
        if let Err(e) = &status {
            warn!(ticket, error = %e, "status fetch failed");
        }
        if let Err(e) = &stats {
            warn!(ticket, error = %e, "stats fetch failed");
        }

        let signal = Signal::FetchCompleted {
            ticket,
            status: status.map_err(|e| e.user_message()),
            stats: stats.map_err(|e| e.user_message()),
        };

        let mut shared = self.inner.lock();
        if !self.inner.commit(&mut shared, signal) {
            debug!(ticket, "discarding stale refresh");
        }
        self.inner.publish(EngineEvent::DataUpdated);
    }

    /// Turn protection on or off.
    ///
    /// The predicted value is visible to observers before the request goes
    /// out. On success the engine waits for the server to settle and
    /// refreshes. With `suppress_errors` a failure is logged and kept in
    /// `last_failure` but never shown as the error.
    ///
    /// The returned result reports the write itself; engine state has
    /// already absorbed it either way.
    pub async fn toggle_protection(&self, enable: bool, suppress_errors: bool) -> Result<()> {
        let id = self.issue_toggle(&mut self.inner.lock(), enable);
        self.write_protection(id, enable, suppress_errors).await
    }

    async fn write_protection(&self, id: ToggleId, enable: bool, suppress_errors: bool) -> Result<()> {
        match self.inner.client.set_protection(enable).await {
            Ok(()) => {
                info!(id, enable, "protection toggled");
                self.inner.signal(Signal::ToggleAcknowledged {
                    id,
                    suppress: suppress_errors,
                });
                let settle = self.inner.config().settling_delay();
                time::sleep(settle).await;
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                warn!(id, enable, suppressed = suppress_errors, error = %e, "protection toggle failed");
                self.inner.signal(Signal::ToggleFailed {
                    id,
                    message: e.user_message(),
                    suppress: suppress_errors,
                });
                Err(e)
            }
        }
    }

    fn issue_toggle(&self, shared: &mut Shared, enable: bool) -> ToggleId {
        let id = shared.state.next_toggle_id();
        self.inner.commit(shared, Signal::ToggleIssued { id, enable });
        debug!(id, enable, "protection toggle issued");
        id
    }

    /// Disable protection now and re-enable it automatically after
    /// `duration`. Re-arming replaces a pending re-enable.
    pub async fn disable_for_duration(&self, duration: Duration) -> Result<()> {
        if duration.is_zero() {
            return Err(GuardError::InvalidArgument(
                "disable duration must be greater than zero".to_string(),
            ));
        }
        // Timer and prediction land in one critical section so no snapshot
        // sees the countdown while protection still reads as on
        let id = {
            let mut shared = self.inner.lock();
            self.arm_reenable(&mut shared, duration)?;
            self.issue_toggle(&mut shared, false)
        };
        self.write_protection(id, false, true).await
    }

    fn arm_reenable(&self, shared: &mut Shared, duration: Duration) -> Result<TimerId> {
        let weak = Arc::downgrade(&self.inner);
        let action = move || async move {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let reconciler = Self { inner };
            if let Err(e) = reconciler.toggle_protection(true, true).await {
                debug!(error = %e, "scheduled re-enable failed");
            }
        };

        let weak = Arc::downgrade(&self.inner);
        let notify: NoticeFn = Arc::new(move |notice| {
            if let Some(inner) = weak.upgrade() {
                inner.on_timer_notice(notice);
            }
        });

        // Armed under the state lock so no notice can overtake TimerArmed.
        // The countdown's first tick announces the armed timer.
        let armed = self.inner.timer.arm(duration, action, notify)?;
        self.inner.commit(
            shared,
            Signal::TimerArmed {
                id: armed.id,
                end_time: armed.end_time,
                remaining_seconds: armed.duration.as_secs_f64(),
            },
        );
        Ok(armed.id)
    }

    /// Cancel any pending re-enable and disable protection indefinitely
    pub async fn disable_permanently(&self) -> Result<()> {
        self.cancel_timer();
        self.toggle_protection(false, true).await
    }

    /// Cancel the pending re-enable without touching protection.
    ///
    /// Returns whether a timer was armed.
    pub fn cancel_timer(&self) -> bool {
        let mut shared = self.inner.lock();
        match self.inner.timer.cancel() {
            Some(id) => {
                self.inner.commit(&mut shared, Signal::TimerCleared { id });
                true
            }
            None => false,
        }
    }

    /// Cancel any pending re-enable and turn protection on
    pub async fn enable_now(&self) -> Result<()> {
        self.cancel_timer();
        self.toggle_protection(true, true).await
    }

    /// Start polling every `interval_secs` seconds, replacing any running
    /// loop. Zero is ignored.
    pub fn start_polling(&self, interval_secs: u64) -> bool {
        self.poll_every(Duration::from_secs(interval_secs))
    }

    fn poll_every(&self, interval: Duration) -> bool {
        let weak = Arc::downgrade(&self.inner);
        self.inner.poller.start(interval, move || {
            let weak = weak.clone();
            async move {
                if let Some(inner) = weak.upgrade() {
                    Self { inner }.refresh().await;
                }
            }
        })
    }

    /// Stop polling
    pub fn stop_polling(&self) -> bool {
        self.inner.poller.stop()
    }

    /// Whether the polling loop is running
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.inner.poller.is_running()
    }

    /// Whether a re-enable is pending
    #[must_use]
    pub fn is_timer_active(&self) -> bool {
        self.inner.timer.is_active()
    }
}
