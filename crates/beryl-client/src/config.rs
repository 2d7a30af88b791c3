//! Client configuration.

use std::time::Duration;

/// Both timeouts default to ten seconds: a hung catalog must not hang
/// purchase construction indefinitely.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a [`crate::CatalogClient`].
///
/// Handed to the client at construction; there is no process-global
/// service URL.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the catalog service, e.g. `https://catalog.example.com`.
    pub base_url: String,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Total per-request timeout.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a configuration with default timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout: DEFAULT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("beryl-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the total per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts() {
        let config = ClientConfig::new("http://localhost:3000");
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("beryl-client/"));
    }

    #[test]
    fn test_builders() {
        let config = ClientConfig::new("http://localhost:3000")
            .with_connect_timeout(Duration::from_secs(2))
            .with_timeout(Duration::from_secs(30))
            .with_user_agent("checkout-service");

        assert_eq!(config.connect_timeout, Duration::from_secs(2));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.user_agent, "checkout-service");
    }
}
