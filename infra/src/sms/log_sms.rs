//! Logging SMS transport
//!
//! A development implementation of [`MessageTransport`] that writes a
//! structured log line instead of sending anything. The code itself is only
//! logged when explicitly enabled.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{info, warn};
use uuid::Uuid;

use otp_core::services::transport::MessageTransport;
use otp_shared::mask_subject;

/// Logging SMS transport for development and testing
///
/// This implementation:
/// - Logs a masked destination for every message
/// - Generates mock message IDs
/// - Tracks message count for testing
#[derive(Debug, Default)]
pub struct LogSmsTransport {
    /// Counter for tracking number of messages sent
    message_count: AtomicU64,
    /// Whether to simulate failures (for testing)
    simulate_failure: AtomicBool,
    /// Whether to include the code in the log line
    log_code: bool,
}

impl LogSmsTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport that also logs the code, for local development only
    pub fn with_code_logging() -> Self {
        Self {
            log_code: true,
            ..Self::default()
        }
    }

    /// Get the total number of messages sent
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }
}

#[async_trait]
impl MessageTransport for LogSmsTransport {
    async fn send_code(&self, destination: &str, code: &str) -> Result<String, String> {
        let masked = mask_subject(destination);

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(
                provider = self.provider_name(),
                destination = %masked,
                "Simulated SMS sending failure"
            );
            return Err("Simulated SMS sending failure".to_string());
        }

        let message_id = format!("log_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.log_code {
            info!(
                target: "sms_service",
                provider = self.provider_name(),
                destination = %masked,
                message_id = %message_id,
                code = code,
                count = count,
                "Verification code sent"
            );
        } else {
            info!(
                target: "sms_service",
                provider = self.provider_name(),
                destination = %masked,
                message_id = %message_id,
                count = count,
                "Verification code sent"
            );
        }

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "log"
    }
}
