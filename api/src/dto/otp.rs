use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Optional leading `+` followed by 10 to 15 digits
static PHONE_NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("valid phone number pattern"));

fn validate_phone_number(phone_number: &str) -> Result<(), ValidationError> {
    if PHONE_NUMBER_REGEX.is_match(phone_number.trim()) {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_phone_number");
        error.message = Some("Phone number must be 10 to 15 digits, optionally prefixed with +".into());
        Err(error)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RequestCodeRequest {
    /// Phone number, e.g. "+989121234567"; surrounding whitespace is ignored
    #[validate(custom = "validate_phone_number")]
    pub phone_number: String,
}

impl RequestCodeRequest {
    /// Subject the code is issued for
    pub fn subject(&self) -> &str {
        self.phone_number.trim()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestCodeResponse {
    pub detail: String,
    /// Seconds until the code expires
    pub expires_in: u64,
    pub requests_remaining: u32,
    /// Only present when the server is configured to expose codes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    #[validate(custom = "validate_phone_number")]
    pub phone_number: String,

    /// Code as received; compared exactly, without trimming
    #[validate(length(max = 10))]
    pub otp: String,
}

impl VerifyCodeRequest {
    pub fn subject(&self) -> &str {
        self.phone_number.trim()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCodeResponse {
    pub verified: bool,
    pub phone_number: String,
}
