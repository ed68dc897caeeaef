//! Main AdGuard Home API client implementation.

use crate::api::{ProtectionApi, StatsApi};
use guardbar_core::{ConnectionSettings, GuardError, Result};
use reqwest::header::RETRY_AFTER;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// AdGuard Home control API client
#[derive(Clone)]
pub struct AdGuardClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    base_url: Url,
    username: String,
    password: String,
    timeout: Duration,
}

impl std::fmt::Debug for AdGuardClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdGuardClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("username", &self.inner.username)
            .finish_non_exhaustive()
    }
}

impl AdGuardClient {
    /// Create a client from connection settings using default options
    pub fn new(settings: &ConnectionSettings) -> Result<Self> {
        settings.require_configured()?;
        Self::builder(settings.base_url())
            .credentials(&settings.username, &settings.password)
            .build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> AdGuardClientBuilder {
        AdGuardClientBuilder::new(base_url)
    }

    /// Access protection endpoints
    #[must_use]
    pub fn protection(&self) -> ProtectionApi<'_> {
        ProtectionApi::new(self)
    }

    /// Access statistics endpoints
    #[must_use]
    pub fn stats(&self) -> StatsApi<'_> {
        StatsApi::new(self)
    }

    /// The base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.inner.base_url.as_str()
    }

    /// Check that the server is reachable and accepts the credentials.
    ///
    /// Failures carry the message a settings screen would show.
    pub async fn test_connection(&self) -> std::result::Result<(), String> {
        match self.protection().status().await {
            Ok(_) => Ok(()),
            Err(GuardError::Connection(_)) => Err(format!(
                "Cannot reach server at {}. Check host and port.",
                self.inner.base_url.as_str().trim_end_matches('/')
            )),
            Err(e) => Err(e.user_message()),
        }
    }

    /// Perform a GET request
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "GET request");

        let response = self
            .inner
            .http
            .get(url)
            .basic_auth(&self.inner.username, Some(&self.inner.password))
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        self.handle_response(response).await
    }

    /// Perform a POST request with a JSON body, ignoring the response body
    pub(crate) async fn post_empty<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<()> {
        let url = self.build_url(path)?;
        debug!(url = %url, "POST request");

        let response = self
            .inner
            .http
            .post(url)
            .basic_auth(&self.inner.username, Some(&self.inner.password))
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        self.handle_empty_response(response).await
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        self.inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| GuardError::InvalidUrl(format!("{path}: {e}")))
    }

    fn transport_error(&self, err: &reqwest::Error) -> GuardError {
        if err.is_timeout() {
            GuardError::Timeout(self.inner.timeout.as_secs())
        } else if err.is_connect() {
            GuardError::Connection(err.to_string())
        } else if err.is_decode() {
            GuardError::Http(format!("malformed response: {err}"))
        } else {
            GuardError::Http(err.to_string())
        }
    }

    /// Handle an API response that returns JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await.map_err(|e| self.transport_error(&e))?;
            serde_json::from_str(&body).map_err(GuardError::Json)
        } else {
            Self::handle_error(status.as_u16(), response).await
        }
    }

    /// Handle an API response whose body is not needed
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            Self::handle_error(status.as_u16(), response).await
        }
    }

    /// Convert an error response to a [`GuardError`]
    async fn handle_error<T>(status: u16, response: reqwest::Response) -> Result<T> {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let body = response.text().await.unwrap_or_default();
        let message = body.trim().to_string();

        match status {
            401 | 403 => Err(GuardError::Unauthorized),
            429 => {
                warn!(?retry_after, "rate limited by AdGuard Home");
                Err(GuardError::RateLimited { retry_after })
            }
            _ => Err(GuardError::Api {
                code: status,
                message,
            }),
        }
    }
}

/// Builder for configuring an [`AdGuardClient`]
pub struct AdGuardClientBuilder {
    base_url: String,
    username: String,
    password: String,
    timeout: Duration,
    user_agent: String,
}

impl AdGuardClientBuilder {
    /// Create a new builder for the given base URL (e.g. `http://192.168.1.2:80`)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            username: String::new(),
            password: String::new(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("guardbar/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the basic auth credentials
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Build the client
    pub fn build(self) -> Result<AdGuardClient> {
        // Url::join drops the last path segment unless the base ends in '/'
        let mut base = self.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url =
            Url::parse(&base).map_err(|e| GuardError::InvalidUrl(format!("{base}: {e}")))?;

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| GuardError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(AdGuardClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                username: self.username,
                password: self.password,
                timeout: self.timeout,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_keeps_base_path() {
        let client = AdGuardClient::builder("http://router.lan:8080/adguard")
            .build()
            .unwrap();
        let url = client.build_url("/control/status").unwrap();
        assert_eq!(url.as_str(), "http://router.lan:8080/adguard/control/status");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = AdGuardClient::builder("not a url").build();
        assert!(matches!(result, Err(GuardError::InvalidUrl(_))));
    }

    #[test]
    fn test_new_requires_credentials() {
        let settings = ConnectionSettings::new("192.168.1.2", 80, "admin", "");
        assert!(matches!(
            AdGuardClient::new(&settings),
            Err(GuardError::NotConfigured(_))
        ));
    }
}
