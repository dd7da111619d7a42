//! Validation of the OTP service configuration

use otp_shared::OtpConfig;

use crate::errors::{OtpError, OtpResult};
use crate::services::generator::OtpGenerator;

/// Check `config` and build the generator it describes.
///
/// Every problem is reported as `InvalidConfiguration`; nothing falls back
/// to a default.
pub(crate) fn validate(config: &OtpConfig) -> OtpResult<OtpGenerator> {
    let generator = OtpGenerator::new(config.code_length)?;

    if config.code_ttl_seconds == 0 {
        return Err(invalid("code TTL must be at least one second"));
    }
    if config.request_window_seconds == 0 {
        return Err(invalid("request window must be at least one second"));
    }
    if config.max_requests_per_window == 0 {
        return Err(invalid("at least one request per window must be allowed"));
    }
    if config.max_verify_attempts == Some(0) {
        return Err(invalid("verification lockout needs at least one attempt"));
    }

    Ok(generator)
}

fn invalid(message: &str) -> OtpError {
    OtpError::InvalidConfiguration {
        message: message.to_string(),
    }
}
