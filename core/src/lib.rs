//! # OTP Core
//!
//! Core business logic for one-time password login. This crate contains the
//! error taxonomy, the code generator, the key-value store and message
//! transport interfaces, and the OTP service that coordinates them.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::IssuedCode;
pub use errors::{OtpError, OtpResult, StoreError, StoreResult};
pub use services::*;
