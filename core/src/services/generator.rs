//! Numeric one-time code generation

use rand::{rngs::OsRng, Rng};
use std::ops::RangeInclusive;

use crate::errors::{OtpError, OtpResult};

/// Shortest supported code
pub const MIN_CODE_LENGTH: usize = 4;

/// Longest supported code
pub const MAX_CODE_LENGTH: usize = 8;

/// Length used when nothing else is configured
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Fixed-length numeric code generator.
///
/// Codes are drawn uniformly from `10^(L-1)..=10^L - 1` using the operating
/// system CSPRNG, so the leading digit is never zero and every code has
/// exactly `L` digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpGenerator {
    length: usize,
}

impl OtpGenerator {
    /// Create a generator for codes of `length` digits
    ///
    /// # Errors
    ///
    /// `OtpError::InvalidConfiguration` when `length` is outside `4..=8`.
    pub fn new(length: usize) -> OtpResult<Self> {
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&length) {
            return Err(OtpError::InvalidConfiguration {
                message: format!(
                    "OTP length must be between {} and {} digits, got {}",
                    MIN_CODE_LENGTH, MAX_CODE_LENGTH, length
                ),
            });
        }
        Ok(Self { length })
    }

    /// Number of digits per code
    pub fn length(&self) -> usize {
        self.length
    }

    /// Inclusive numeric range codes are drawn from
    pub fn range(&self) -> RangeInclusive<u32> {
        let exponent = self.length as u32;
        10u32.pow(exponent - 1)..=10u32.pow(exponent) - 1
    }

    /// Generate a new code
    pub fn generate(&self) -> String {
        OsRng.gen_range(self.range()).to_string()
    }
}

impl Default for OtpGenerator {
    fn default() -> Self {
        Self {
            length: DEFAULT_CODE_LENGTH,
        }
    }
}

/// Generate a single code of `length` digits
pub fn generate_code(length: usize) -> OtpResult<String> {
    OtpGenerator::new(length).map(|generator| generator.generate())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_codes_fill_the_full_digit_range() {
        for length in MIN_CODE_LENGTH..=MAX_CODE_LENGTH {
            let generator = OtpGenerator::new(length).unwrap();
            let range = generator.range();

            for _ in 0..10_000 {
                let code = generator.generate();
                assert_eq!(code.len(), length);
                assert!(code.chars().all(|c| c.is_ascii_digit()));
                assert!(!code.starts_with('0'));

                let value: u32 = code.parse().unwrap();
                assert!(range.contains(&value), "{} outside {:?}", value, range);
            }
        }
    }

    #[test]
    fn test_range_bounds() {
        assert_eq!(OtpGenerator::new(4).unwrap().range(), 1_000..=9_999);
        assert_eq!(OtpGenerator::new(8).unwrap().range(), 10_000_000..=99_999_999);
    }

    #[test]
    fn test_out_of_range_lengths_are_rejected() {
        for length in [0, 3, 9, 12] {
            match OtpGenerator::new(length) {
                Err(OtpError::InvalidConfiguration { message }) => {
                    assert!(message.contains(&length.to_string()));
                }
                other => panic!("expected invalid configuration, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_default_length_is_six() {
        assert_eq!(OtpGenerator::default().length(), DEFAULT_CODE_LENGTH);
        assert_eq!(generate_code(6).unwrap().len(), 6);
        assert!(generate_code(3).is_err());
    }

    #[test]
    fn test_codes_vary() {
        let generator = OtpGenerator::default();
        let codes: std::collections::HashSet<String> =
            (0..50).map(|_| generator.generate()).collect();
        assert!(codes.len() > 1);
    }
}
