//! Shared configuration and utilities for the OTP backend
//!
//! This crate provides functionality used across all server crates:
//! - Configuration types and layered loading
//! - Configuration error type
//! - Subject masking for log output

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheBackend, CacheConfig, Environment, LogFormat, LoggingConfig, OtpConfig,
    RateLimitMode, ServerConfig,
};
pub use errors::SettingsError;
pub use utils::mask_subject;
