//! # Infrastructure Layer
//!
//! Concrete implementations of the interfaces declared in `otp_core`:
//!
//! - **Cache**: Redis-backed [`cache::RedisClient`] and the process-local
//!   [`cache::MemoryStore`], both implementing `KeyValueStore`
//! - **SMS**: [`sms::LogSmsTransport`], a development `MessageTransport`

/// Cache module - Redis client and in-memory store
pub mod cache;

/// SMS module - message transports
pub mod sms;

pub use cache::{MemoryStore, RedisClient};
pub use sms::LogSmsTransport;

/// Errors raised while building infrastructure services.
///
/// Once a client exists, its operations report `otp_core::StoreError` instead.
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connecting did not finish within the configured timeout
    #[error("Timed out connecting to {0}")]
    Timeout(String),
}
