//! Key-value store abstraction backing the OTP service

use async_trait::async_trait;

use crate::errors::{StoreError, StoreResult};

/// Typed access to a remote key-value store.
///
/// Implementations must make `increment` atomic at the store level; the
/// request limit relies on it under concurrent callers. Every transport
/// failure is reported as `StoreError::BackendUnavailable`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value and its expiry.
    /// `ttl_seconds = None` stores the key without expiry.
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> StoreResult<()>;

    /// Read a value; `None` when the key is absent or expired
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Remove a key, reporting whether it was present.
    /// Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Atomically add one to an integer key (absent keys count from zero)
    async fn increment(&self, key: &str) -> StoreResult<i64>;

    /// Set or replace the expiry of an existing key; a no-op when the key is gone
    async fn expire(&self, key: &str, ttl_seconds: u64) -> StoreResult<()>;

    /// Whether the key is present
    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Remaining lifetime in seconds; `None` when absent or without expiry
    async fn ttl(&self, key: &str) -> StoreResult<Option<u64>>;

    /// Whether the store answers; stores without a remote end are always healthy
    async fn health_check(&self) -> StoreResult<bool> {
        Ok(true)
    }
}

/// Reject empty keys before they reach a store
pub fn ensure_key(key: &str) -> StoreResult<()> {
    if key.is_empty() {
        return Err(StoreError::InvalidArgument {
            message: "key must not be empty".to_string(),
        });
    }
    Ok(())
}
