//! Pure state reducer for the reconciliation engine.
//!
//! Every change to engine state is expressed as a [`Signal`] and folded into
//! an [`EngineState`]. Nothing in this module performs I/O, spawns tasks or
//! reads the clock, so any interleaving of network results, toggles and timer
//! events can be replayed deterministically in tests.
//!
//! The derived [`ReconciledState`] is recomputed from scratch on demand and
//! is never stored.

use chrono::{DateTime, Utc};
use guardbar_core::{format_remaining, IconState, ProtectionStatus, Stats, TimerState};
use serde::Serialize;

/// Start-ordered identifier of a status/stats fetch
pub type FetchTicket = u64;

/// Identifier of a protection toggle
pub type ToggleId = u64;

/// Identifier of an armed re-enable timer
pub type TimerId = u64;

/// One state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// A refresh cycle began
    FetchStarted { ticket: FetchTicket },
    /// A refresh cycle finished; each part carries a display message on failure
    FetchCompleted {
        ticket: FetchTicket,
        status: Result<ProtectionStatus, String>,
        stats: Result<Stats, String>,
    },
    /// The user (or the timer) asked for protection on/off
    ToggleIssued { id: ToggleId, enable: bool },
    /// The server accepted the write
    ToggleAcknowledged { id: ToggleId, suppress: bool },
    /// The write failed
    ToggleFailed {
        id: ToggleId,
        message: String,
        suppress: bool,
    },
    /// A re-enable timer was armed, replacing any previous one
    TimerArmed {
        id: TimerId,
        end_time: DateTime<Utc>,
        remaining_seconds: f64,
    },
    /// Countdown display update
    TimerTicked { id: TimerId, remaining_seconds: f64 },
    /// The timer fired and finished, or was cancelled
    TimerCleared { id: TimerId },
}

/// A locally predicted protection value awaiting confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prediction {
    /// Predicted protection state
    pub value: bool,
    toggle: ToggleId,
    /// Set once the write resolved. Any fetch started after this ticket
    /// reflects the write and is trusted over the prediction.
    settled_after: Option<FetchTicket>,
}

impl Prediction {
    /// The toggle that produced this prediction
    #[must_use]
    pub const fn toggle(&self) -> ToggleId {
        self.toggle
    }

    /// Whether the write behind this prediction has resolved
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.settled_after.is_some()
    }
}

/// Where the effective protection value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "value", rename_all = "snake_case")]
pub enum ProtectionView {
    /// Nothing fetched and nothing predicted
    Unknown,
    /// Reported by the server
    Confirmed(bool),
    /// Predicted locally, not yet confirmed
    Predicted(bool),
}

impl ProtectionView {
    /// Effective protection, `false` when unknown
    #[must_use]
    pub const fn is_on(self) -> bool {
        match self {
            Self::Unknown => false,
            Self::Confirmed(on) | Self::Predicted(on) => on,
        }
    }
}

/// The single source of UI truth, derived from raw signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReconciledState {
    /// Protection signal with its provenance
    pub protection: ProtectionView,
    /// Prediction if present, else the server value, else false
    pub effective_protection_on: bool,
    /// Icon state by strict precedence
    pub icon: IconState,
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveTimer {
    id: TimerId,
    state: TimerState,
}

/// Raw engine state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineState {
    status: Option<ProtectionStatus>,
    stats: Option<Stats>,
    error: Option<String>,
    last_failure: Option<String>,
    prediction: Option<Prediction>,
    timer: Option<ActiveTimer>,
    issued_ticket: FetchTicket,
    applied_ticket: FetchTicket,
    last_toggle: ToggleId,
}

impl EngineState {
    /// Fresh state: nothing fetched, nothing predicted, no timer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a sequence of signals into a fresh state
    pub fn replay<I>(signals: I) -> Self
    where
        I: IntoIterator<Item = Signal>,
    {
        let mut state = Self::new();
        for signal in signals {
            state.apply(signal);
        }
        state
    }

    /// Ticket for the next fetch to start
    #[must_use]
    pub const fn next_ticket(&self) -> FetchTicket {
        self.issued_ticket + 1
    }

    /// Id for the next toggle
    #[must_use]
    pub const fn next_toggle_id(&self) -> ToggleId {
        self.last_toggle + 1
    }

    /// Apply one signal. Returns false if the signal was stale and ignored.
    pub fn apply(&mut self, signal: Signal) -> bool {
        match signal {
            Signal::FetchStarted { ticket } => {
                self.issued_ticket = self.issued_ticket.max(ticket);
                true
            }
            Signal::FetchCompleted {
                ticket,
                status,
                stats,
            } => self.complete_fetch(ticket, status, stats),
            Signal::ToggleIssued { id, enable } => {
                self.last_toggle = self.last_toggle.max(id);
                self.prediction = Some(Prediction {
                    value: enable,
                    toggle: id,
                    settled_after: None,
                });
                true
            }
            Signal::ToggleAcknowledged { id, suppress } => {
                if !suppress {
                    self.error = None;
                }
                self.settle_prediction(id)
            }
            Signal::ToggleFailed {
                id,
                message,
                suppress,
            } => {
                self.last_failure = Some(message.clone());
                if suppress {
                    self.settle_prediction(id)
                } else {
                    self.error = Some(message);
                    if self.prediction.is_some_and(|p| p.toggle == id) {
                        self.prediction = None;
                    }
                    true
                }
            }
            Signal::TimerArmed {
                id,
                end_time,
                remaining_seconds,
            } => {
                self.timer = Some(ActiveTimer {
                    id,
                    state: TimerState {
                        active: true,
                        end_time: Some(end_time),
                        remaining_seconds,
                    },
                });
                true
            }
            Signal::TimerTicked {
                id,
                remaining_seconds,
            } => match self.timer.as_mut() {
                Some(timer) if timer.id == id => {
                    timer.state.remaining_seconds = remaining_seconds.max(0.0);
                    true
                }
                _ => false,
            },
            Signal::TimerCleared { id } => {
                if self.timer.as_ref().is_some_and(|t| t.id == id) {
                    self.timer = None;
                    true
                } else {
                    false
                }
            }
        }
    }

    fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        status: Result<ProtectionStatus, String>,
        stats: Result<Stats, String>,
    ) -> bool {
        // Last refresh wins: a fetch that started before the one already
        // applied must not clobber it.
        if ticket <= self.applied_ticket {
            return false;
        }
        self.applied_ticket = ticket;

        let mut failure = None;

        match status {
            Ok(status) => {
                if let Some(prediction) = self.prediction {
                    let confirmed = status.protection_enabled == prediction.value;
                    let reflects_write = prediction.settled_after.is_some_and(|s| ticket > s);
                    if confirmed || reflects_write {
                        self.prediction = None;
                    }
                }
                self.status = Some(status);
            }
            Err(message) => failure = Some(message),
        }

        match stats {
            Ok(stats) => self.stats = Some(stats),
            Err(message) => {
                failure.get_or_insert(message);
            }
        }

        if let Some(message) = &failure {
            self.last_failure = Some(message.clone());
        }
        self.error = failure;
        true
    }

    fn settle_prediction(&mut self, id: ToggleId) -> bool {
        match self.prediction.as_mut() {
            Some(prediction) if prediction.toggle == id => {
                prediction.settled_after = Some(self.issued_ticket);
                true
            }
            // A newer toggle replaced this prediction
            _ => false,
        }
    }

    /// Derive the reconciled state
    #[must_use]
    pub fn reconcile(&self) -> ReconciledState {
        let protection = match (self.prediction, &self.status) {
            (Some(prediction), _) => ProtectionView::Predicted(prediction.value),
            (None, Some(status)) => ProtectionView::Confirmed(status.protection_enabled),
            (None, None) => ProtectionView::Unknown,
        };
        let effective_protection_on = protection.is_on();

        let icon = if self.error.is_some() && self.prediction.is_none() {
            IconState::Error
        } else if self.status.is_none() {
            IconState::Loading
        } else if self.timer.is_some() {
            IconState::TimerActive
        } else if effective_protection_on {
            IconState::ProtectionOn
        } else {
            IconState::ProtectionOff
        };

        ReconciledState {
            protection,
            effective_protection_on,
            icon,
        }
    }

    /// Last successfully fetched status
    #[must_use]
    pub const fn status(&self) -> Option<&ProtectionStatus> {
        self.status.as_ref()
    }

    /// Last successfully fetched stats
    #[must_use]
    pub const fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    /// User-visible error from the most recent attempt
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Most recent failure of any kind, including suppressed ones
    #[must_use]
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    /// Pending prediction, if any
    #[must_use]
    pub const fn prediction(&self) -> Option<Prediction> {
        self.prediction
    }

    /// Id of the armed timer
    #[must_use]
    pub fn timer_id(&self) -> Option<TimerId> {
        self.timer.as_ref().map(|t| t.id)
    }

    /// Countdown state, inactive when no timer is armed
    #[must_use]
    pub fn timer(&self) -> TimerState {
        self.timer
            .as_ref()
            .map_or_else(TimerState::inactive, |t| t.state.clone())
    }

    /// Everything the presentation layer needs, in one consistent copy
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            status: self.status.clone(),
            stats: self.stats.clone(),
            error: self.error.clone(),
            last_failure: self.last_failure.clone(),
            timer: self.timer(),
            reconciled: self.reconcile(),
        }
    }
}

/// Consistent copy of engine state for observers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineSnapshot {
    /// Last successfully fetched status
    pub status: Option<ProtectionStatus>,
    /// Last successfully fetched stats
    pub stats: Option<Stats>,
    /// User-visible error
    pub error: Option<String>,
    /// Most recent failure, including suppressed ones
    pub last_failure: Option<String>,
    /// Re-enable countdown
    pub timer: TimerState,
    /// Derived protection and icon state
    pub reconciled: ReconciledState,
}

impl EngineSnapshot {
    /// One-line header text
    #[must_use]
    pub fn status_line(&self) -> String {
        if self.status.is_none() {
            return "Loading...".to_string();
        }
        if self.timer.active {
            return if self.timer.remaining_seconds > 0.0 {
                format!(
                    "Re-enabling in {}",
                    format_remaining(self.timer.remaining_seconds)
                )
            } else {
                "Re-enabling...".to_string()
            };
        }
        format!(
            "Ad Blocking: {}",
            if self.reconciled.effective_protection_on {
                "ON"
            } else {
                "OFF"
            }
        )
    }
}
