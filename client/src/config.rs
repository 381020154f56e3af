//! API client configuration.
//!
//! Configuration values should be provided by the embedding application,
//! not hardcoded; [`ApiConfig::from_env`] covers the common case of a
//! base URL injected through the environment.

use std::time::Duration;

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "LADRILLO_API_URL";

/// Default API base URL used when the environment does not provide one.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// API client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the platform API (e.g. `https://api.example.com/api`).
    ///
    /// Endpoint paths are appended verbatim, so the value must not end
    /// with a slash.
    pub base_url: String,

    /// Per-request timeout.
    ///
    /// Default: 30 seconds
    pub request_timeout: Duration,

    /// Access-token lifetime used when persisting tokens client-side.
    ///
    /// Default: 1 day
    pub access_ttl: chrono::Duration,

    /// Refresh-token lifetime used when persisting tokens client-side.
    ///
    /// Default: 7 days
    pub refresh_ttl: chrono::Duration,
}

impl ApiConfig {
    /// Create a new configuration for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            base_url,
            request_timeout: Duration::from_secs(30),
            access_ttl: chrono::Duration::days(1),
            refresh_ttl: chrono::Duration::days(7),
        }
    }

    /// Create a configuration from `LADRILLO_API_URL`, falling back to the
    /// local development default.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    /// Set the per-request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the persisted access-token lifetime.
    #[must_use]
    pub const fn with_access_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    /// Set the persisted refresh-token lifetime.
    #[must_use]
    pub const fn with_refresh_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ApiConfig::new("https://api.example.com/api")
            .with_request_timeout(Duration::from_secs(5))
            .with_access_ttl(chrono::Duration::hours(2));

        assert_eq!(config.base_url, "https://api.example.com/api");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.access_ttl, chrono::Duration::hours(2));
        assert_eq!(config.refresh_ttl, chrono::Duration::days(7));
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let config = ApiConfig::new("https://api.example.com/api/");
        assert_eq!(config.base_url, "https://api.example.com/api");
    }

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.access_ttl, chrono::Duration::days(1));
    }
}
