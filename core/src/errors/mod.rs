//! Domain-specific error types and error handling.
//!
//! Two layers: [`StoreError`] is what a key-value adapter may report, and
//! [`OtpError`] is the full taxonomy surfaced by the OTP service. Store errors
//! convert losslessly into the matching OTP error kinds.

use thiserror::Error;


/// Errors raised at the key-value adapter boundary.
///
/// Transport failures of any kind (refused connections, timeouts, protocol
/// errors) are collapsed into `BackendUnavailable`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Key-value backend unavailable: {message}")]
    BackendUnavailable { message: String },
}

impl StoreError {
    /// Shorthand for a transport failure
    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::BackendUnavailable {
            message: message.into(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the OTP service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Too many OTP requests: at most {limit} per {window_seconds} seconds")]
    RateLimitExceeded { limit: u32, window_seconds: u64 },

    #[error("Verification code expired or missing")]
    CodeExpiredOrMissing,

    #[error("Verification code does not match")]
    CodeMismatch,

    #[error("Key-value backend unavailable: {message}")]
    BackendUnavailable { message: String },
}

impl OtpError {
    /// Stable machine-readable identifier, used in API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            OtpError::InvalidConfiguration { .. } => "invalid_configuration",
            OtpError::InvalidArgument { .. } => "invalid_argument",
            OtpError::RateLimitExceeded { .. } => "rate_limit_exceeded",
            OtpError::CodeExpiredOrMissing => "code_expired_or_missing",
            OtpError::CodeMismatch => "code_mismatch",
            OtpError::BackendUnavailable { .. } => "backend_unavailable",
        }
    }

    /// Whether the caller is at fault (4xx) rather than the system (5xx)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            OtpError::InvalidArgument { .. }
                | OtpError::RateLimitExceeded { .. }
                | OtpError::CodeExpiredOrMissing
                | OtpError::CodeMismatch
        )
    }
}

impl From<StoreError> for OtpError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::InvalidArgument { message } => OtpError::InvalidArgument { message },
            StoreError::BackendUnavailable { message } => OtpError::BackendUnavailable { message },
        }
    }
}

pub type OtpResult<T> = Result<T, OtpError>;
