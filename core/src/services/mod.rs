//! Business services containing domain logic and use cases.

pub mod generator;
pub mod otp;
pub mod store;
pub mod transport;

// Re-export commonly used types
pub use generator::{generate_code, OtpGenerator, DEFAULT_CODE_LENGTH, MAX_CODE_LENGTH, MIN_CODE_LENGTH};
pub use otp::OtpService;
pub use store::{ensure_key, KeyValueStore};
pub use transport::MessageTransport;
