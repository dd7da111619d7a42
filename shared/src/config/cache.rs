//! Cache configuration module

use serde::{Deserialize, Serialize};

/// Which key-value store backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    /// Shared Redis server
    #[default]
    Redis,
    /// Process-local store; state is lost on restart and not shared between
    /// instances
    Memory,
}

/// Cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Store implementation to use
    pub backend: CacheBackend,

    /// Seconds between sweeps of expired entries (memory backend only)
    pub purge_interval_seconds: u64,

    /// Redis connection URL
    pub url: String,

    /// Connection timeout in seconds
    pub connection_timeout: u64,

    /// Response timeout in seconds, applied to every command
    pub response_timeout: u64,

    /// Maximum attempts for connecting and for transient command failures
    pub max_retries: u32,

    /// Base delay between retries in milliseconds (doubled per attempt)
    pub retry_delay_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Redis,
            purge_interval_seconds: 60,
            url: String::from("redis://localhost:6379"),
            connection_timeout: 5,
            response_timeout: 5,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Override the retry policy
    pub fn with_retries(mut self, max_retries: u32, retry_delay_ms: u64) -> Self {
        self.max_retries = max_retries.max(1);
        self.retry_delay_ms = retry_delay_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.backend, CacheBackend::Redis);
        assert_eq!(config.purge_interval_seconds, 60);
        assert_eq!(config.url, "redis://localhost:6379");
        assert_eq!(config.response_timeout, 5);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_with_retries_keeps_at_least_one_attempt() {
        let config = CacheConfig::new("redis://cache:6379").with_retries(0, 10);
        assert_eq!(config.url, "redis://cache:6379");
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.retry_delay_ms, 10);
    }
}
