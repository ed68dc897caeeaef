use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::GuardError;

/// Predefined "disable for" durations offered by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DisablePreset {
    /// 30 seconds
    #[serde(rename = "30 seconds")]
    ThirtySeconds,
    /// 1 minute
    #[serde(rename = "1 minute")]
    OneMinute,
    /// 5 minutes
    #[serde(rename = "5 minutes")]
    FiveMinutes,
    /// 10 minutes
    #[serde(rename = "10 minutes")]
    TenMinutes,
    /// 15 minutes
    #[serde(rename = "15 minutes")]
    FifteenMinutes,
    /// 30 minutes
    #[serde(rename = "30 minutes")]
    ThirtyMinutes,
    /// 1 hour
    #[serde(rename = "1 hour")]
    OneHour,
    /// 2 hours
    #[serde(rename = "2 hours")]
    TwoHours,
}

impl DisablePreset {
    /// Every preset, shortest first
    pub const ALL: [Self; 8] = [
        Self::ThirtySeconds,
        Self::OneMinute,
        Self::FiveMinutes,
        Self::TenMinutes,
        Self::FifteenMinutes,
        Self::ThirtyMinutes,
        Self::OneHour,
        Self::TwoHours,
    ];

    /// How long protection stays off
    #[must_use]
    pub const fn duration(self) -> Duration {
        let secs = match self {
            Self::ThirtySeconds => 30,
            Self::OneMinute => 60,
            Self::FiveMinutes => 5 * 60,
            Self::TenMinutes => 10 * 60,
            Self::FifteenMinutes => 15 * 60,
            Self::ThirtyMinutes => 30 * 60,
            Self::OneHour => 60 * 60,
            Self::TwoHours => 2 * 60 * 60,
        };
        Duration::from_secs(secs)
    }

    /// Display label, also the serialized form
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ThirtySeconds => "30 seconds",
            Self::OneMinute => "1 minute",
            Self::FiveMinutes => "5 minutes",
            Self::TenMinutes => "10 minutes",
            Self::FifteenMinutes => "15 minutes",
            Self::ThirtyMinutes => "30 minutes",
            Self::OneHour => "1 hour",
            Self::TwoHours => "2 hours",
        }
    }

    /// Whether the preset is offered before the user customizes the list
    #[must_use]
    pub const fn is_enabled_by_default(self) -> bool {
        match self {
            Self::ThirtySeconds
            | Self::OneMinute
            | Self::FiveMinutes
            | Self::ThirtyMinutes
            | Self::OneHour => true,
            Self::TenMinutes | Self::FifteenMinutes | Self::TwoHours => false,
        }
    }

    /// Presets enabled by default
    pub fn defaults() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(|p| p.is_enabled_by_default())
    }

    /// Find the preset with exactly this duration
    #[must_use]
    pub fn from_duration(duration: Duration) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.duration() == duration)
    }
}

impl std::fmt::Display for DisablePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DisablePreset {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(preset) = Self::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(trimmed))
        {
            return Ok(preset);
        }
        let duration = parse_duration(trimmed)?;
        Self::from_duration(duration).ok_or_else(|| {
            GuardError::InvalidArgument(format!("no preset matches '{s}'"))
        })
    }
}

/// Parse a compact duration such as `90`, `90s`, `5m` or `2h`.
///
/// A bare number is read as seconds. Zero is rejected.
pub fn parse_duration(s: &str) -> crate::Result<Duration> {
    let s = s.trim();
    let (digits, unit) = match s.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
        Some((idx, _)) => s.split_at(idx),
        None => (s, ""),
    };

    let value: u64 = digits
        .parse()
        .map_err(|_| GuardError::InvalidArgument(format!("invalid duration '{s}'")))?;

    let multiplier = match unit.trim() {
        "" | "s" | "sec" | "secs" => 1,
        "m" | "min" | "mins" => 60,
        "h" | "hr" | "hrs" => 60 * 60,
        other => {
            return Err(GuardError::InvalidArgument(format!(
                "unknown duration unit '{other}' (use s, m or h)"
            )))
        }
    };

    match value.checked_mul(multiplier) {
        Some(0) => Err(GuardError::InvalidArgument(
            "duration must be greater than zero".to_string(),
        )),
        Some(secs) => Ok(Duration::from_secs(secs)),
        None => Err(GuardError::InvalidArgument(format!("duration '{s}' is too large"))),
    }
}
