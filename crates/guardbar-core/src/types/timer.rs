use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the scheduled re-enable countdown
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    /// Whether a re-enable is pending
    pub active: bool,

    /// Wall-clock time at which protection comes back
    pub end_time: Option<DateTime<Utc>>,

    /// Seconds left, as of the last countdown tick
    pub remaining_seconds: f64,
}

impl TimerState {
    /// The cleared state
    #[must_use]
    pub const fn inactive() -> Self {
        Self {
            active: false,
            end_time: None,
            remaining_seconds: 0.0,
        }
    }

    /// Countdown text, e.g. `4m 59s`
    #[must_use]
    pub fn formatted_remaining(&self) -> String {
        format_remaining(self.remaining_seconds)
    }
}

/// Format a countdown as `Xh Ym`, `Xm Ys` or `Xs`
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_remaining(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}
