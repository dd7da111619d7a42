//! OTP route handlers
//!
//! - `POST /api/v1/otp/request`: issue a code and hand it to the transport
//! - `POST /api/v1/otp/verify`: check a code and consume it

pub mod request_code;
pub mod verify_code;

use std::sync::Arc;

use otp_core::{KeyValueStore, MessageTransport, OtpService};

/// Application state that holds shared services
pub struct AppState<K, T>
where
    K: KeyValueStore,
    T: MessageTransport,
{
    pub otp_service: Arc<OtpService<K>>,
    pub transport: Arc<T>,
    /// Echo the issued code in the response body (development only)
    pub expose_code: bool,
}

impl<K, T> AppState<K, T>
where
    K: KeyValueStore,
    T: MessageTransport,
{
    pub fn new(otp_service: Arc<OtpService<K>>, transport: Arc<T>, expose_code: bool) -> Self {
        Self {
            otp_service,
            transport,
            expose_code,
        }
    }
}
