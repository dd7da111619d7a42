//! OTP issuance and rate limiting configuration module

use serde::{Deserialize, Serialize};

/// How the per-subject request limit is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitMode {
    /// Read the counter, refuse at the limit, increment after the code is stored.
    ///
    /// Two concurrent requests can both pass the read before either increments,
    /// so a subject may briefly exceed the limit by the number of racing callers.
    #[default]
    BestEffort,
    /// Increment first and refuse when the new value exceeds the limit.
    ///
    /// Refused requests still consume a slot in the current window.
    Strict,
}

/// OTP configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OtpConfig {
    /// Digits per code, 4 to 8
    pub code_length: usize,

    /// Code lifetime in seconds
    pub code_ttl_seconds: u64,

    /// Rate limit window in seconds, anchored at the first request
    pub request_window_seconds: u64,

    /// Requests allowed per subject within one window
    pub max_requests_per_window: u32,

    /// Enforcement strategy for the request limit
    pub rate_limit_mode: RateLimitMode,

    /// Wrong guesses tolerated before the active code is discarded.
    /// `None` keeps codes valid until they expire or are consumed.
    pub max_verify_attempts: Option<u32>,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: 6,
            code_ttl_seconds: 120,
            request_window_seconds: 3600,
            max_requests_per_window: 5,
            rate_limit_mode: RateLimitMode::default(),
            max_verify_attempts: None,
        }
    }
}

impl OtpConfig {
    /// Set the code lifetime
    pub fn with_ttl(mut self, seconds: u64) -> Self {
        self.code_ttl_seconds = seconds;
        self
    }

    /// Set the request limit and its window
    pub fn with_rate_limit(mut self, max_requests: u32, window_seconds: u64) -> Self {
        self.max_requests_per_window = max_requests;
        self.request_window_seconds = window_seconds;
        self
    }

    /// Set the enforcement strategy
    pub fn with_mode(mut self, mode: RateLimitMode) -> Self {
        self.rate_limit_mode = mode;
        self
    }

    /// Enable the verification lockout
    pub fn with_max_verify_attempts(mut self, attempts: u32) -> Self {
        self.max_verify_attempts = Some(attempts);
        self
    }
}
