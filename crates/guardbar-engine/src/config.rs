//! Engine tuning: polling, settling delay and offered presets.

use std::collections::BTreeSet;
use std::time::Duration;

use guardbar_core::DisablePreset;
use serde::{Deserialize, Serialize};

/// Polling intervals offered in preferences, in seconds
pub const POLLING_INTERVAL_CHOICES: [u64; 5] = [15, 30, 60, 120, 300];

/// Configuration for a [`Reconciler`](crate::Reconciler).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Whether the engine refreshes on its own (default: true).
    #[serde(default = "default_polling_enabled")]
    pub polling_enabled: bool,

    /// Seconds between refreshes (default: 30). Zero disables polling.
    #[serde(default = "default_polling_interval")]
    pub polling_interval_secs: u64,

    /// Milliseconds to wait after a successful toggle before re-fetching
    /// (default: 500).
    #[serde(default = "default_settling_delay")]
    pub settling_delay_ms: u64,

    /// "Disable for" presets to offer.
    #[serde(default = "default_presets")]
    pub enabled_presets: BTreeSet<DisablePreset>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            polling_enabled: default_polling_enabled(),
            polling_interval_secs: default_polling_interval(),
            settling_delay_ms: default_settling_delay(),
            enabled_presets: default_presets(),
        }
    }
}

impl EngineConfig {
    /// Interval to poll at, or `None` when polling is off
    #[must_use]
    pub fn effective_polling_interval(&self) -> Option<Duration> {
        (self.polling_enabled && self.polling_interval_secs > 0)
            .then(|| Duration::from_secs(self.polling_interval_secs))
    }

    /// Delay between a successful toggle and the confirming refresh
    #[must_use]
    pub const fn settling_delay(&self) -> Duration {
        Duration::from_millis(self.settling_delay_ms)
    }

    /// Enabled presets, shortest first
    pub fn presets(&self) -> impl Iterator<Item = DisablePreset> + '_ {
        self.enabled_presets.iter().copied()
    }

    /// Whether the polling settings differ from `other`
    #[must_use]
    pub fn polling_changed(&self, other: &Self) -> bool {
        self.effective_polling_interval() != other.effective_polling_interval()
    }
}

const fn default_polling_enabled() -> bool {
    true
}

const fn default_polling_interval() -> u64 {
    30
}

const fn default_settling_delay() -> u64 {
    500
}

fn default_presets() -> BTreeSet<DisablePreset> {
    DisablePreset::defaults().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(
            config.effective_polling_interval(),
            Some(Duration::from_secs(30))
        );
        assert_eq!(config.settling_delay(), Duration::from_millis(500));
        assert_eq!(config.presets().count(), 5);
        assert!(POLLING_INTERVAL_CHOICES.contains(&config.polling_interval_secs));
    }

    #[test]
    fn test_partial_toml() {
        let config: EngineConfig = toml::from_str(
            r#"
            polling_interval_secs = 60
            enabled_presets = ["2 hours", "30 seconds"]
            "#,
        )
        .unwrap();
        assert!(config.polling_enabled);
        assert_eq!(config.polling_interval_secs, 60);
        assert_eq!(config.settling_delay_ms, 500);
        let presets: Vec<_> = config.presets().collect();
        assert_eq!(
            presets,
            vec![DisablePreset::ThirtySeconds, DisablePreset::TwoHours]
        );
    }

    #[test]
    fn test_polling_disabled() {
        let off = EngineConfig {
            polling_enabled: false,
            ..Default::default()
        };
        assert!(off.effective_polling_interval().is_none());
        assert!(off.polling_changed(&EngineConfig::default()));

        let zero = EngineConfig {
            polling_interval_secs: 0,
            ..Default::default()
        };
        assert!(zero.effective_polling_interval().is_none());
        assert!(!zero.polling_changed(&off));
    }
}
