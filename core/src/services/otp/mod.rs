//! OTP service module
//!
//! This module provides the one-time password workflow:
//! - Code generation and caching with a configurable lifetime
//! - Per-subject request limiting over a fixed window
//! - Exactly-once verification with optional wrong-guess lockout

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use service::OtpService;
