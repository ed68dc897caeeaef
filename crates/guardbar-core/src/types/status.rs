use serde::{Deserialize, Deserializer, Serialize};

/// Protection status from `/control/status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionStatus {
    /// Whether DNS filtering is currently blocking
    pub protection_enabled: bool,

    /// Whether the DNS server is running
    #[serde(default)]
    pub running: bool,

    /// AdGuard Home version string
    #[serde(default)]
    pub version: Option<String>,

    /// Addresses the DNS server listens on, in server order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dns_addresses: Vec<String>,
}

impl ProtectionStatus {
    /// Create a status with no version or addresses
    #[must_use]
    pub const fn new(protection_enabled: bool, running: bool) -> Self {
        Self {
            protection_enabled,
            running,
            version: None,
            dns_addresses: Vec::new(),
        }
    }

    /// Human-readable protection label
    #[must_use]
    pub const fn protection_label(&self) -> &'static str {
        if self.protection_enabled {
            "ON"
        } else {
            "OFF"
        }
    }
}

// AdGuard Home sends `"dns_addresses": null` when it has no listeners yet.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_status() {
        let json = r#"{
            "protection_enabled": true,
            "running": true,
            "version": "v0.107.52",
            "dns_addresses": ["127.0.0.1:53", "[::1]:53"],
            "dns_port": 53,
            "http_port": 80
        }"#;

        let status: ProtectionStatus = serde_json::from_str(json).unwrap();
        assert!(status.protection_enabled);
        assert!(status.running);
        assert_eq!(status.version.as_deref(), Some("v0.107.52"));
        assert_eq!(status.dns_addresses, vec!["127.0.0.1:53", "[::1]:53"]);
        assert_eq!(status.protection_label(), "ON");
    }

    #[test]
    fn test_parse_null_addresses() {
        let json = r#"{"protection_enabled": false, "running": true, "dns_addresses": null}"#;
        let status: ProtectionStatus = serde_json::from_str(json).unwrap();
        assert!(!status.protection_enabled);
        assert!(status.dns_addresses.is_empty());
        assert!(status.version.is_none());
    }

    #[test]
    fn test_missing_protection_flag_is_rejected() {
        let json = r#"{"running": true}"#;
        assert!(serde_json::from_str::<ProtectionStatus>(json).is_err());
    }
}
