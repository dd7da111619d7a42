//! SMS Transport Module
//!
//! Message transports that deliver issued codes. Only the logging transport
//! ships here; real providers plug in through `otp_core::MessageTransport`.

pub mod log_sms;

pub use log_sms::LogSmsTransport;
