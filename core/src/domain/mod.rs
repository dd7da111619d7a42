//! Domain layer containing the OTP key namespace and value types.

pub mod issued_code;
pub mod keys;

pub use issued_code::IssuedCode;
