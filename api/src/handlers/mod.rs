pub mod error;

pub use error::{handle_otp_error, handle_validation_error};
