//! Process-local key-value store
//!
//! Mirrors the Redis semantics the OTP service relies on (atomic increment,
//! per-key expiry, delete reporting presence) without a server. State is not
//! shared between processes, so it only fits development and tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::debug;

use otp_core::errors::{StoreError, StoreResult};
use otp_core::services::store::{ensure_key, KeyValueStore};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// In-memory [`KeyValueStore`] with expiry on the tokio clock
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop expired entries, returning how many were removed.
    ///
    /// Expired entries are already invisible to readers; this only reclaims
    /// memory. Long-running processes call it through
    /// [`spawn_purge_task`](Self::spawn_purge_task).
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        let purged = before - entries.len();
        if purged > 0 {
            debug!(purged = purged, "Purged expired entries");
        }
        purged
    }

    /// Run [`purge_expired`](Self::purge_expired) every `every` until the
    /// returned handle is aborted.
    pub fn spawn_purge_task(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                self.purge_expired().await;
            }
        })
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> StoreResult<()> {
        ensure_key(key)?;
        let expires_at = ttl_seconds.map(|ttl| Instant::now() + Duration::from_secs(ttl));
        self.entries.lock().await.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        ensure_key(key)?;
        let now = Instant::now();
        Ok(self
            .entries
            .lock()
            .await
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone()))
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        ensure_key(key)?;
        let now = Instant::now();
        let removed = self.entries.lock().await.remove(key);
        Ok(removed.map_or(false, |entry| entry.is_live(now)))
    }

    async fn increment(&self, key: &str) -> StoreResult<i64> {
        ensure_key(key)?;
        let now = Instant::now();
        let mut entries = self.entries.lock().await;

        let current = match entries.get(key).filter(|entry| entry.is_live(now)) {
            Some(entry) => entry.value.parse::<i64>().map_err(|_| {
                StoreError::unavailable(format!("value at {} is not an integer", key))
            })?,
            None => 0,
        };
        let next = current + 1;

        let expires_at = entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .and_then(|entry| entry.expires_at);
        entries.insert(
            key.to_string(),
            Entry {
                value: next.to_string(),
                expires_at,
            },
        );
        Ok(next)
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> StoreResult<()> {
        ensure_key(key)?;
        let now = Instant::now();
        if let Some(entry) = self.entries.lock().await.get_mut(key) {
            if entry.is_live(now) {
                entry.expires_at = Some(now + Duration::from_secs(ttl_seconds));
            }
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    async fn ttl(&self, key: &str) -> StoreResult<Option<u64>> {
        ensure_key(key)?;
        let now = Instant::now();
        Ok(self
            .entries
            .lock()
            .await
            .get(key)
            .filter(|entry| entry.is_live(now))
            .and_then(|entry| entry.expires_at)
            .map(|at| at.saturating_duration_since(now).as_secs()))
    }
}
