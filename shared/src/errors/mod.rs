//! Error type for configuration loading

use thiserror::Error;

/// Raised when the application configuration cannot be assembled.
///
/// Malformed values (a non-numeric TTL, an unknown rate limit mode) end up here
/// rather than being replaced by defaults, so a misconfigured deployment fails
/// at startup.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),
}
