//! OTP coordinator: issuance, rate limiting and exactly-once verification

use constant_time_eq::constant_time_eq;
use std::sync::Arc;
use tracing::{debug, info, warn};

use otp_shared::{mask_subject, OtpConfig, RateLimitMode};

use crate::domain::keys;
use crate::domain::IssuedCode;
use crate::errors::{OtpError, OtpResult};
use crate::services::generator::OtpGenerator;
use crate::services::store::KeyValueStore;

use super::config::validate;

/// OTP service built on a shared key-value store.
///
/// Per subject the store holds at most one active code (`otp:{subject}`) and a
/// request counter (`otp:req:{subject}`). The service keeps no state of its
/// own; concurrency control is delegated to the store's atomic increment.
pub struct OtpService<K: KeyValueStore> {
    /// Key-value store holding codes and counters
    store: Arc<K>,
    /// Generator configured with the code length
    generator: OtpGenerator,
    /// Service configuration
    config: OtpConfig,
}

impl<K: KeyValueStore> OtpService<K> {
    /// Create a new OTP service
    ///
    /// # Arguments
    ///
    /// * `store` - Key-value store implementation
    /// * `config` - Code length, lifetime and rate limit settings
    ///
    /// # Errors
    ///
    /// `OtpError::InvalidConfiguration` if the code length is outside `4..=8`
    /// or any lifetime, window or limit is zero.
    pub fn new(store: Arc<K>, config: OtpConfig) -> OtpResult<Self> {
        let generator = validate(&config)?;
        Ok(Self {
            store,
            generator,
            config,
        })
    }

    /// Generate a code for `subject`, cache it and count the request.
    ///
    /// Any previous unexpired code for the subject is replaced. The returned
    /// code must be delivered by the caller.
    ///
    /// With [`RateLimitMode::BestEffort`] the counter is read before and
    /// incremented after the code is stored, so near-simultaneous requests
    /// can each pass the check. [`RateLimitMode::Strict`] increments first
    /// and refuses once the new count exceeds the limit.
    ///
    /// # Errors
    ///
    /// * `OtpError::RateLimitExceeded` - the subject used up its window
    /// * `OtpError::BackendUnavailable` - the store could not be reached
    pub async fn generate_and_cache(&self, subject: &str) -> OtpResult<IssuedCode> {
        ensure_subject(subject)?;
        let max_requests = self.config.max_requests_per_window;

        let counted = match self.config.rate_limit_mode {
            RateLimitMode::BestEffort => {
                let current = self.request_count(subject).await?;
                if current >= max_requests {
                    return Err(self.rate_limited(subject, current));
                }
                None
            }
            RateLimitMode::Strict => {
                let count = self.increment_request_count(subject).await?;
                if count > max_requests {
                    return Err(self.rate_limited(subject, count));
                }
                Some(count)
            }
        };

        let code = self.generator.generate();
        self.cache_code(subject, &code, None).await?;

        if self.config.max_verify_attempts.is_some() {
            self.store.delete(&keys::attempts_key(subject)).await?;
        }

        let count = match counted {
            Some(count) => count,
            None => self.increment_request_count(subject).await?,
        };

        info!(
            subject = %mask_subject(subject),
            event = "otp_issued",
            request_count = count,
            ttl_seconds = self.config.code_ttl_seconds,
            "Generated and cached verification code"
        );

        Ok(IssuedCode::new(
            code,
            self.config.code_ttl_seconds,
            max_requests.saturating_sub(count),
        ))
    }

    /// Check `candidate` against the active code and consume it on success.
    ///
    /// Consumption is exactly-once: only the caller whose delete removes the
    /// key succeeds, so a replay of the same code fails with
    /// `CodeExpiredOrMissing`. A wrong guess leaves the code in place unless
    /// the lockout is configured and exhausted.
    ///
    /// # Errors
    ///
    /// * `OtpError::CodeExpiredOrMissing` - nothing cached (never requested,
    ///   expired, already used or discarded by the lockout)
    /// * `OtpError::CodeMismatch` - a code is cached but differs
    /// * `OtpError::BackendUnavailable` - the store could not be reached
    pub async fn verify(&self, subject: &str, candidate: &str) -> OtpResult<()> {
        ensure_subject(subject)?;
        let masked = mask_subject(subject);

        let cached = match self.store.get(&keys::code_key(subject)).await? {
            Some(code) => code,
            None => {
                warn!(
                    subject = %masked,
                    event = "otp_missing",
                    "Verification code expired or missing"
                );
                return Err(OtpError::CodeExpiredOrMissing);
            }
        };

        if !codes_match(&cached, candidate) {
            warn!(
                subject = %masked,
                event = "otp_mismatch",
                "Incorrect verification code entered"
            );
            self.record_failed_attempt(subject).await?;
            return Err(OtpError::CodeMismatch);
        }

        if !self.store.delete(&keys::code_key(subject)).await? {
            // Consumed by a concurrent verification between our read and delete
            warn!(
                subject = %masked,
                event = "otp_already_consumed",
                "Verification code was consumed concurrently"
            );
            return Err(OtpError::CodeExpiredOrMissing);
        }

        if self.config.max_verify_attempts.is_some() {
            self.store.delete(&keys::attempts_key(subject)).await?;
        }

        info!(
            subject = %masked,
            event = "otp_verified",
            "Verification code verified and consumed"
        );
        Ok(())
    }

    /// Discard the active code for `subject`; idempotent
    pub async fn invalidate(&self, subject: &str) -> OtpResult<()> {
        ensure_subject(subject)?;
        let removed = self.store.delete(&keys::code_key(subject)).await?;
        debug!(
            subject = %mask_subject(subject),
            removed = removed,
            "Invalidated verification code"
        );
        Ok(())
    }

    /// Store `code` as the active code for `subject`.
    ///
    /// `ttl_seconds` defaults to the configured code lifetime.
    pub async fn cache_code(
        &self,
        subject: &str,
        code: &str,
        ttl_seconds: Option<u64>,
    ) -> OtpResult<()> {
        ensure_subject(subject)?;
        let ttl = ttl_seconds.unwrap_or(self.config.code_ttl_seconds);
        if ttl == 0 {
            return Err(OtpError::InvalidArgument {
                message: "code TTL must be at least one second".to_string(),
            });
        }

        self.store
            .set(&keys::code_key(subject), code, Some(ttl))
            .await?;
        Ok(())
    }

    /// Seconds until the active code expires; `None` without an active code
    pub async fn code_ttl(&self, subject: &str) -> OtpResult<Option<u64>> {
        ensure_subject(subject)?;
        Ok(self.store.ttl(&keys::code_key(subject)).await?)
    }

    /// Count one request for `subject` and return the new count.
    ///
    /// The window expiry is set only by the increment that opens the window,
    /// so later requests never extend it. If the key vanishes between the
    /// increment and the expiry call the store treats the expiry as a no-op.
    pub async fn increment_request_count(&self, subject: &str) -> OtpResult<u32> {
        ensure_subject(subject)?;
        let key = keys::request_key(subject);

        let count = self.store.increment(&key).await?;
        if count == 1 {
            self.store
                .expire(&key, self.config.request_window_seconds)
                .await?;
        }

        debug!(
            subject = %mask_subject(subject),
            request_count = count,
            max_requests = self.config.max_requests_per_window,
            "Counted OTP request"
        );
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    /// Requests counted for `subject` in the current window
    pub async fn request_count(&self, subject: &str) -> OtpResult<u32> {
        ensure_subject(subject)?;
        match self.store.get(&keys::request_key(subject)).await? {
            Some(value) => value.parse().map_err(|_| OtpError::BackendUnavailable {
                message: format!("request counter holds a non-numeric value: {:?}", value),
            }),
            None => Ok(0),
        }
    }

    /// Whether `subject` may request another code; read-only
    pub async fn can_request(&self, subject: &str) -> OtpResult<bool> {
        Ok(self.request_count(subject).await? < self.config.max_requests_per_window)
    }

    /// Requests left for `subject` in the current window; read-only
    pub async fn remaining_requests(&self, subject: &str) -> OtpResult<u32> {
        let count = self.request_count(subject).await?;
        Ok(self.config.max_requests_per_window.saturating_sub(count))
    }

    /// Whether the backing store answers
    ///
    /// Returns `Ok(false)` for an unexpected reply and
    /// `OtpError::BackendUnavailable` when the store cannot be reached.
    pub async fn health_check(&self) -> OtpResult<bool> {
        let healthy = self.store.health_check().await?;
        if !healthy {
            warn!("Key-value store reported unhealthy");
        }
        Ok(healthy)
    }

    /// Count a wrong guess and discard the code once the lockout is reached
    async fn record_failed_attempt(&self, subject: &str) -> OtpResult<()> {
        let max_attempts = match self.config.max_verify_attempts {
            Some(max_attempts) => max_attempts,
            None => return Ok(()),
        };

        let key = keys::attempts_key(subject);
        let attempts = self.store.increment(&key).await?;
        if attempts == 1 {
            self.store.expire(&key, self.config.code_ttl_seconds).await?;
        }

        if attempts >= i64::from(max_attempts) {
            warn!(
                subject = %mask_subject(subject),
                event = "otp_locked_out",
                attempts = attempts,
                "Too many wrong verification attempts, discarding code"
            );
            self.store.delete(&keys::code_key(subject)).await?;
            self.store.delete(&key).await?;
        }
        Ok(())
    }

    fn rate_limited(&self, subject: &str, count: u32) -> OtpError {
        warn!(
            subject = %mask_subject(subject),
            event = "rate_limit_exceeded",
            request_count = count,
            max_requests = self.config.max_requests_per_window,
            "OTP request rate limit exceeded"
        );
        OtpError::RateLimitExceeded {
            limit: self.config.max_requests_per_window,
            window_seconds: self.config.request_window_seconds,
        }
    }
}

/// Exact comparison in constant time for equal-length inputs
fn codes_match(cached: &str, candidate: &str) -> bool {
    cached.len() == candidate.len() && constant_time_eq(cached.as_bytes(), candidate.as_bytes())
}

fn ensure_subject(subject: &str) -> OtpResult<()> {
    if subject.is_empty() {
        return Err(OtpError::InvalidArgument {
            message: "subject must not be empty".to_string(),
        });
    }
    Ok(())
}
