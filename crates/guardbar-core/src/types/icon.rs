use serde::{Deserialize, Serialize};

/// The single derived state shown by the status icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconState {
    /// No status has been fetched yet
    Loading,
    /// The most recent fetch or toggle failed
    Error,
    /// A temporary disable is counting down
    TimerActive,
    /// Ad blocking is active
    ProtectionOn,
    /// Ad blocking is disabled
    ProtectionOff,
}

impl IconState {
    /// Symbol name for the icon
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Loading => "shield",
            Self::Error | Self::ProtectionOff => "shield.slash.fill",
            Self::TimerActive => "clock.badge.exclamationmark.fill",
            Self::ProtectionOn => "shield.fill",
        }
    }

    /// Short description
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Error => "error",
            Self::TimerActive => "timer active",
            Self::ProtectionOn => "protection on",
            Self::ProtectionOff => "protection off",
        }
    }
}

impl std::fmt::Display for IconState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
