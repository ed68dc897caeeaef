use serde::{Deserialize, Serialize};

use crate::GuardError;

/// Default AdGuard Home web interface port
pub const DEFAULT_PORT: u16 = 80;

const DEMO_USERNAME: &str = "demo";
const DEMO_PASSWORD: &str = "testing";

/// Where and how to reach AdGuard Home.
///
/// The engine is only started once host, username and password are all set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// Hostname or IP address
    #[serde(default)]
    pub host: String,

    /// Web interface port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Admin username
    #[serde(default)]
    pub username: String,

    /// Admin password
    #[serde(default, skip_serializing)]
    pub password: String,
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            username: String::new(),
            password: String::new(),
        }
    }
}

impl ConnectionSettings {
    /// Create settings for a host with credentials
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns true if every required field is non-empty
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Names of the required fields that are still empty
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.host.trim().is_empty() {
            missing.push("host");
        }
        if self.username.is_empty() {
            missing.push("username");
        }
        if self.password.is_empty() {
            missing.push("password");
        }
        missing
    }

    /// Fail with [`GuardError::NotConfigured`] unless every field is set
    pub fn require_configured(&self) -> crate::Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(GuardError::NotConfigured(format!(
                "missing {}",
                missing.join(", ")
            )))
        }
    }

    /// Base URL of the web interface
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host.trim(), self.port)
    }

    /// The demo credentials select an offline client with canned data
    #[must_use]
    pub fn is_demo(&self) -> bool {
        self.username == DEMO_USERNAME && self.password == DEMO_PASSWORD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_by_default() {
        let settings = ConnectionSettings::default();
        assert!(!settings.is_configured());
        assert_eq!(settings.missing_fields(), vec!["host", "username", "password"]);
        assert!(matches!(
            settings.require_configured(),
            Err(GuardError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_configured() {
        let settings = ConnectionSettings::new("192.168.1.2", 3000, "admin", "secret");
        assert!(settings.is_configured());
        assert!(settings.require_configured().is_ok());
        assert_eq!(settings.base_url(), "http://192.168.1.2:3000");
        assert!(!settings.is_demo());
    }

    #[test]
    fn test_missing_password_only() {
        let settings = ConnectionSettings::new("adguard.lan", 80, "admin", "");
        assert_eq!(settings.missing_fields(), vec!["password"]);
    }

    #[test]
    fn test_demo_credentials() {
        let settings = ConnectionSettings::new("localhost", 80, "demo", "testing");
        assert!(settings.is_demo());
    }

    #[test]
    fn test_password_not_serialized() {
        let settings = ConnectionSettings::new("adguard.lan", 80, "admin", "secret");
        let json = serde_json::to_string(&settings).unwrap();
        assert!(!json.contains("secret"));
    }
}
