//! Configuration module with business-specific sub-modules
//!
//! - `cache` - Store backend and Redis connection configuration
//! - `environment` - Environment detection and logging configuration
//! - `otp` - Code length, lifetime and rate limiting
//! - `server` - HTTP server configuration
//!
//! [`AppConfig::load`] layers, from lowest to highest precedence: built-in
//! defaults, `config.<environment>.toml` if present, `APP_`-prefixed
//! environment variables (`APP_OTP__CODE_TTL_SECONDS=300`) and finally the
//! flat variable names used by existing deployments (`OTP_TTL`, `REDIS_URL`).

pub mod cache;
pub mod environment;
pub mod otp;
pub mod server;

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, File};
use serde::{Deserialize, Serialize};

use crate::errors::SettingsError;

pub use cache::{CacheBackend, CacheConfig};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use otp::{OtpConfig, RateLimitMode};
pub use server::ServerConfig;

/// Flat environment variables mapped onto configuration keys
const LEGACY_VARIABLES: &[(&str, &str)] = &[
    ("CACHE_BACKEND", "cache.backend"),
    ("REDIS_URL", "cache.url"),
    ("OTP_LENGTH", "otp.code_length"),
    ("OTP_TTL", "otp.code_ttl_seconds"),
    ("OTP_REQUEST_WINDOW", "otp.request_window_seconds"),
    ("OTP_MAX_REQUESTS", "otp.max_requests_per_window"),
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
];

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Cache configuration
    pub cache: CacheConfig,

    /// OTP configuration
    pub otp: OtpConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the environment named by `ENVIRONMENT`
    pub fn load() -> Result<Self, SettingsError> {
        let environment = Environment::from_env();
        let builder = Config::builder()
            .add_source(File::with_name(environment.config_file()).required(false))
            .add_source(
                ::config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::from_builder(builder, environment, |name| std::env::var(name).ok())
    }

    /// Finish loading from a prepared builder.
    ///
    /// `lookup` resolves the flat legacy variables; it is a parameter so tests
    /// do not have to mutate the process environment.
    pub fn from_builder<F>(
        builder: ConfigBuilder<DefaultState>,
        environment: Environment,
        lookup: F,
    ) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let logging = LoggingConfig::for_environment(environment);
        let mut builder = builder
            .set_default("logging.level", logging.level)?
            .set_default("logging.format", logging.format.as_str())?;

        for (variable, key) in LEGACY_VARIABLES {
            builder = builder.set_override_option(*key, lookup(variable))?;
        }

        let mut config: AppConfig = builder.build()?.try_deserialize()?;
        config.environment = environment;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::config::FileFormat;
    use std::collections::HashMap;

    fn no_legacy(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_sources() {
        let config =
            AppConfig::from_builder(Config::builder(), Environment::Development, no_legacy).unwrap();

        assert_eq!(config.otp.code_length, 6);
        assert_eq!(config.otp.code_ttl_seconds, 120);
        assert_eq!(config.cache.backend, CacheBackend::Redis);
        assert_eq!(config.cache.url, "redis://localhost:6379");
        assert!(!config.server.expose_code_in_response);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_toml_file_overrides_defaults() {
        let toml = r#"
            [otp]
            code_ttl_seconds = 300
            max_requests_per_window = 10
            rate_limit_mode = "strict"
            max_verify_attempts = 3

            [server]
            expose_code_in_response = true
        "#;
        let builder = Config::builder().add_source(File::from_str(toml, FileFormat::Toml));

        let config = AppConfig::from_builder(builder, Environment::Staging, no_legacy).unwrap();

        assert_eq!(config.environment, Environment::Staging);
        assert_eq!(config.otp.code_ttl_seconds, 300);
        assert_eq!(config.otp.max_requests_per_window, 10);
        assert_eq!(config.otp.rate_limit_mode, RateLimitMode::Strict);
        assert_eq!(config.otp.max_verify_attempts, Some(3));
        assert_eq!(config.otp.request_window_seconds, 3600);
        assert!(config.server.expose_code_in_response);
    }

    #[test]
    fn test_memory_backend_is_selectable() {
        let toml = "[cache]\nbackend = \"memory\"\npurge_interval_seconds = 15\n";
        let builder = Config::builder().add_source(File::from_str(toml, FileFormat::Toml));

        let config = AppConfig::from_builder(builder, Environment::Development, no_legacy).unwrap();

        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.cache.purge_interval_seconds, 15);
        assert_eq!(config.cache.url, "redis://localhost:6379");
    }

    #[test]
    fn test_unknown_backend_is_an_error() {
        let result = AppConfig::from_builder(Config::builder(), Environment::Development, |name| {
            (name == "CACHE_BACKEND").then(|| "memcached".to_string())
        });

        assert!(matches!(result, Err(SettingsError::Load(_))));
    }

    #[test]
    fn test_legacy_variables_take_precedence() {
        let toml = "[otp]\ncode_ttl_seconds = 300\n";
        let builder = Config::builder().add_source(File::from_str(toml, FileFormat::Toml));
        let vars: HashMap<&str, &str> = [
            ("OTP_TTL", "90"),
            ("OTP_MAX_REQUESTS", "7"),
            ("REDIS_URL", "redis://cache:6380/1"),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::from_builder(builder, Environment::Production, |name| {
            vars.get(name).map(|v| v.to_string())
        })
        .unwrap();

        assert_eq!(config.otp.code_ttl_seconds, 90);
        assert_eq!(config.otp.max_requests_per_window, 7);
        assert_eq!(config.cache.url, "redis://cache:6380/1");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_malformed_value_is_an_error() {
        let result = AppConfig::from_builder(Config::builder(), Environment::Development, |name| {
            (name == "OTP_TTL").then(|| "two minutes".to_string())
        });

        assert!(matches!(result, Err(SettingsError::Load(_))));
    }
}
