//! Result of a successful code request

use chrono::{DateTime, Duration, Utc};

/// A freshly generated and cached code.
///
/// The plaintext `code` is handed to the caller for delivery; it is not meant
/// to travel back over the public API outside of development setups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCode {
    /// The generated digits
    pub code: String,

    /// Seconds until the store evicts the code
    pub expires_in_seconds: u64,

    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,

    /// Requests the subject may still make in the current window
    pub requests_remaining: u32,
}

impl IssuedCode {
    pub(crate) fn new(code: String, ttl_seconds: u64, requests_remaining: u32) -> Self {
        Self {
            code,
            expires_in_seconds: ttl_seconds,
            expires_at: Utc::now() + Duration::seconds(ttl_seconds as i64),
            requests_remaining,
        }
    }
}
