//! Key-value namespace for OTP records.
//!
//! The first two shapes are shared with existing deployments and must stay
//! bit-exact:
//! - `otp:{subject}` - the active code
//! - `otp:req:{subject}` - request counter for the current rate window
//! - `otp_attempts:{subject}` - wrong guesses against the active code (lockout only)
//!
//! Subjects are opaque, so the code key of a subject starting with `req:`
//! shares a name with another subject's request counter. That layout is
//! inherited. The attempts counter uses its own prefix, which no code or
//! request key can produce.

/// Prefix shared by every OTP key
pub const OTP_KEY_PREFIX: &str = "otp";

/// Key holding the active code for a subject
pub fn code_key(subject: &str) -> String {
    format!("{}:{}", OTP_KEY_PREFIX, subject)
}

/// Key holding the request counter for a subject
pub fn request_key(subject: &str) -> String {
    format!("{}:req:{}", OTP_KEY_PREFIX, subject)
}

/// Prefix of the failed verification counters
pub const ATTEMPTS_KEY_PREFIX: &str = "otp_attempts";

/// Key holding the failed verification counter for a subject
pub fn attempts_key(subject: &str) -> String {
    format!("{}:{}", ATTEMPTS_KEY_PREFIX, subject)
}
