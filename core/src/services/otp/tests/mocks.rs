//! Mock key-value store for testing the OTP service

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use crate::errors::{StoreError, StoreResult};
use crate::services::store::{ensure_key, KeyValueStore};

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

// Expiry runs on the tokio clock so paused tests can fast-forward it
pub struct MockStore {
    entries: Mutex<HashMap<String, Entry>>,
    pub should_fail: AtomicBool,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.should_fail.store(failing, Ordering::SeqCst);
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
    }

    fn check(&self, key: &str) -> StoreResult<()> {
        ensure_key(key)?;
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("mock store offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MockStore {
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> StoreResult<()> {
        self.check(key)?;
        let expires_at = ttl_seconds.map(|ttl| Instant::now() + Duration::from_secs(ttl));
        self.entries.lock().unwrap().insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.check(key)?;
        Ok(self.raw(key))
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        self.check(key)?;
        let now = Instant::now();
        let removed = self.entries.lock().unwrap().remove(key);
        Ok(removed.map_or(false, |entry| entry.is_live(now)))
    }

    async fn increment(&self, key: &str) -> StoreResult<i64> {
        self.check(key)?;
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| Entry {
                value: "0".to_string(),
                expires_at: None,
            });
        if !entry.is_live(now) {
            entry.value = "0".to_string();
            entry.expires_at = None;
        }
        let next = entry.value.parse::<i64>().unwrap() + 1;
        entry.value = next.to_string();
        Ok(next)
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> StoreResult<()> {
        self.check(key)?;
        let now = Instant::now();
        if let Some(entry) = self.entries.lock().unwrap().get_mut(key) {
            if entry.is_live(now) {
                entry.expires_at = Some(now + Duration::from_secs(ttl_seconds));
            }
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        self.check(key)?;
        Ok(self.raw(key).is_some())
    }

    async fn ttl(&self, key: &str) -> StoreResult<Option<u64>> {
        self.check(key)?;
        let now = Instant::now();
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(key)
            .filter(|entry| entry.is_live(now))
            .and_then(|entry| entry.expires_at)
            .map(|at| at.saturating_duration_since(now).as_secs()))
    }

    async fn health_check(&self) -> StoreResult<bool> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("mock store offline"));
        }
        Ok(true)
    }
}
