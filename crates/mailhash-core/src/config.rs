//! Store connection configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Hash key under which all mail accounts are stored by default.
pub const DEFAULT_ACCOUNTS_KEY: &str = "email::accounts::key";

/// Redis URL used when none is configured.
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/";

/// Configuration for the account store.
///
/// Timeouts are written as whole seconds in serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Redis connection URL.
    pub url: String,
    /// Top-level hash key holding the accounts.
    pub accounts_key: String,
    /// Connection timeout.
    #[serde(with = "seconds", rename = "connect_timeout_secs")]
    pub connect_timeout: Duration,
    /// Timeout for each command.
    #[serde(with = "seconds", rename = "response_timeout_secs")]
    pub response_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REDIS_URL)
    }
}

impl StoreConfig {
    /// Creates a configuration for `url` with the default key and timeouts.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            accounts_key: DEFAULT_ACCOUNTS_KEY.to_string(),
            connect_timeout: Duration::from_secs(5),
            response_timeout: Duration::from_secs(2),
        }
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder(url: impl Into<String>) -> StoreConfigBuilder {
        StoreConfigBuilder::new(url)
    }

    /// Check that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the URL or accounts key is blank, or a
    /// timeout is zero.
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(Error::Config("store URL is empty".to_string()));
        }
        if self.accounts_key.trim().is_empty() {
            return Err(Error::Config("accounts key is empty".to_string()));
        }
        if self.connect_timeout.is_zero() || self.response_timeout.is_zero() {
            return Err(Error::Config("timeouts must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Builder for [`StoreConfig`].
#[derive(Debug, Clone)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Creates a new builder with the given URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            config: StoreConfig::new(url),
        }
    }

    /// Sets the accounts hash key.
    #[must_use]
    pub fn accounts_key(mut self, key: impl Into<String>) -> Self {
        self.config.accounts_key = key.into();
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Sets the per-command timeout.
    #[must_use]
    pub const fn response_timeout(mut self, timeout: Duration) -> Self {
        self.config.response_timeout = timeout;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> StoreConfig {
        self.config
    }
}

/// Serde helpers for `Duration` as whole seconds.
mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)] // Required by serde with= signature
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.url, DEFAULT_REDIS_URL);
        assert_eq!(config.accounts_key, "email::accounts::key");
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.response_timeout, Duration::from_secs(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_overrides() {
        let config = StoreConfig::builder("redis://cache:6380/1")
            .accounts_key("tenant::accounts")
            .connect_timeout(Duration::from_secs(1))
            .response_timeout(Duration::from_secs(10))
            .build();

        assert_eq!(config.url, "redis://cache:6380/1");
        assert_eq!(config.accounts_key, "tenant::accounts");
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
        assert_eq!(config.response_timeout, Duration::from_secs(10));
    }

    #[test]
    fn blank_key_rejected() {
        let config = StoreConfig::builder(DEFAULT_REDIS_URL)
            .accounts_key("  ")
            .build();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = StoreConfig::builder(DEFAULT_REDIS_URL)
            .response_timeout(Duration::ZERO)
            .build();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"url":"redis://db/","response_timeout_secs":7}"#).unwrap();
        assert_eq!(config.url, "redis://db/");
        assert_eq!(config.accounts_key, DEFAULT_ACCOUNTS_KEY);
        assert_eq!(config.response_timeout, Duration::from_secs(7));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
    }
}
