//! Outbound delivery of issued codes

use async_trait::async_trait;

/// Delivers a code to the destination named by the subject (SMS, email).
///
/// The OTP service never calls this itself; callers deliver after a
/// successful request and treat delivery as best-effort.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Send `code` to `destination`, returning a provider message id
    async fn send_code(&self, destination: &str, code: &str) -> Result<String, String>;

    /// Provider name for logs
    fn provider_name(&self) -> &str;
}
