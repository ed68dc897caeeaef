use thiserror::Error;

/// Result type alias for GuardBar operations
pub type Result<T> = std::result::Result<T, GuardError>;

/// Errors that can occur while talking to AdGuard Home or driving the engine
#[derive(Error, Debug)]
pub enum GuardError {
    /// Authentication failed - credentials rejected
    #[error("authentication failed: invalid username or password")]
    Unauthorized,

    /// AdGuard Home is throttling requests (usually after failed logins)
    #[error("rate limit exceeded, retry after {retry_after:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying
        retry_after: Option<u64>,
    },

    /// AdGuard Home returned an error response
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from the server
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Request timed out
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Connection failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Host, username or password has not been set
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// Caller passed an unusable value (zero duration, unknown preset)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Coarse classification used by the engine and the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unreachable host, timeout, malformed response, unexpected status
    NetworkFailure,
    /// Rejected credentials
    AuthFailure,
    /// Remote throttling
    RateLimited,
    /// No credentials set; reported as "unconfigured", not as an error
    ConfigurationMissing,
}

impl GuardError {
    /// Classify this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized => ErrorKind::AuthFailure,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::NotConfigured(_) => ErrorKind::ConfigurationMissing,
            _ => ErrorKind::NetworkFailure,
        }
    }

    /// Returns true if the error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Timeout(_) | Self::Connection(_)
        )
    }

    /// Returns true if the error is due to authentication
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns the HTTP status code if this is an API error
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::RateLimited { .. } => Some(429),
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Short message suitable for a status panel
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized => "Invalid username or password".to_string(),
            Self::RateLimited { .. } => {
                "Too many failed attempts. AdGuard Home has temporarily blocked access.".to_string()
            }
            Self::Timeout(_) => "Connection timed out. Check your host and port.".to_string(),
            Self::Api { code, .. } => format!("Server returned error: HTTP {code}"),
            Self::Json(_) => "Invalid response from server".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(GuardError::Unauthorized.kind(), ErrorKind::AuthFailure);
        assert_eq!(
            GuardError::RateLimited { retry_after: None }.kind(),
            ErrorKind::RateLimited
        );
        assert_eq!(
            GuardError::NotConfigured("host".into()).kind(),
            ErrorKind::ConfigurationMissing
        );
        assert_eq!(GuardError::Timeout(10).kind(), ErrorKind::NetworkFailure);
        assert_eq!(
            GuardError::Api {
                code: 500,
                message: "boom".into()
            }
            .kind(),
            ErrorKind::NetworkFailure
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(GuardError::Unauthorized.status_code(), Some(401));
        assert_eq!(
            GuardError::RateLimited {
                retry_after: Some(30)
            }
            .status_code(),
            Some(429)
        );
        assert_eq!(GuardError::Connection("refused".into()).status_code(), None);
    }

    #[test]
    fn test_user_message_is_never_empty() {
        let errors = [
            GuardError::Unauthorized,
            GuardError::Timeout(10),
            GuardError::Connection("refused".into()),
            GuardError::Api {
                code: 502,
                message: String::new(),
            },
        ];
        for err in errors {
            assert!(!err.user_message().is_empty(), "{err:?}");
        }
        assert_eq!(
            GuardError::Api {
                code: 502,
                message: String::new()
            }
            .user_message(),
            "Server returned error: HTTP 502"
        );
    }
}
