//! Redis cache client implementation
//!
//! This module provides the production [`KeyValueStore`]: a Redis client with
//! a single multiplexed connection, bounded retry logic and a response timeout
//! on every command. Codes, request counters and attempt counters all live in
//! Redis so that every application instance sees the same state.

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use otp_core::errors::{StoreError, StoreResult};
use otp_core::services::store::{ensure_key, KeyValueStore};
use otp_shared::{mask_subject, CacheConfig};

use crate::InfrastructureError;

/// Upper bound for the exponential backoff between attempts
const MAX_BACKOFF_MS: u64 = 5000;

type CommandFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis cache client with retry logic
///
/// Cloning is cheap: clones share the underlying multiplexed connection.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Configuration used to create this client
    config: CacheConfig,
    /// Deadline for a single command round-trip
    response_timeout: Duration,
}

impl RedisClient {
    /// Connect to Redis using `config`
    ///
    /// Connecting is retried up to `config.max_retries` times with exponential
    /// backoff starting at `config.retry_delay_ms`.
    ///
    /// # Example
    /// ```no_run
    /// use otp_infra::cache::{CacheConfig, RedisClient};
    ///
    /// async fn create_client() -> Result<RedisClient, Box<dyn std::error::Error>> {
    ///     let client = RedisClient::new(CacheConfig::new("redis://localhost:6379")).await?;
    ///     Ok(client)
    /// }
    /// ```
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!(url = %mask_url(&config.url), "Creating Redis client");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection = Self::create_connection_with_retry(&client, &config).await?;

        info!("Redis client created successfully");

        Ok(Self {
            connection,
            response_timeout: Duration::from_secs(config.response_timeout.max(1)),
            config,
        })
    }

    /// Create multiplexed connection with retry logic
    async fn create_connection_with_retry(
        client: &Client,
        config: &CacheConfig,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let max_retries = config.max_retries.max(1);
        let connect_timeout = Duration::from_secs(config.connection_timeout.max(1));
        let mut attempts = 0;
        let mut delay = config.retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            let failure = match timeout(connect_timeout, client.get_multiplexed_async_connection())
                .await
            {
                Ok(Ok(connection)) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Ok(Err(e)) => InfrastructureError::Cache(e),
                Err(_) => InfrastructureError::Timeout(mask_url(&config.url)),
            };

            if attempts >= max_retries {
                error!(
                    "Failed to connect to Redis after {} attempts: {}",
                    attempts, failure
                );
                return Err(failure);
            }

            warn!(
                "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                attempts, max_retries, failure, delay
            );
            sleep(Duration::from_millis(delay)).await;
            delay = next_delay(delay);
        }
    }

    /// Execute an idempotent Redis operation with automatic retry logic
    async fn execute_with_retry<F, T>(&self, command: &'static str, operation: F) -> StoreResult<T>
    where
        F: Fn(MultiplexedConnection) -> CommandFuture<T>,
    {
        self.execute(command, self.config.max_retries.max(1), operation)
            .await
    }

    /// Run `operation` at most `max_attempts` times.
    ///
    /// Only transient Redis errors are retried. A timed-out command is never
    /// retried because it may already have been applied.
    async fn execute<F, T>(
        &self,
        command: &'static str,
        max_attempts: u32,
        operation: F,
    ) -> StoreResult<T>
    where
        F: Fn(MultiplexedConnection) -> CommandFuture<T>,
    {
        let mut attempts = 0;
        let mut delay = self.config.retry_delay_ms;

        loop {
            attempts += 1;
            let conn = self.connection.clone();

            match timeout(self.response_timeout, operation(conn)).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) if attempts < max_attempts && is_retriable_error(&e) => {
                    warn!(
                        "Redis {} failed (attempt {}/{}): {}. Retrying in {}ms...",
                        command, attempts, max_attempts, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = next_delay(delay);
                }
                Ok(Err(e)) => {
                    error!("Redis {} failed after {} attempts: {}", command, attempts, e);
                    return Err(StoreError::unavailable(format!("Redis {} failed: {}", command, e)));
                }
                Err(_) => {
                    error!(
                        "Redis {} timed out after {}s",
                        command,
                        self.response_timeout.as_secs()
                    );
                    return Err(StoreError::unavailable(format!(
                        "Redis {} timed out",
                        command
                    )));
                }
            }
        }
    }
}

#[async_trait]
impl KeyValueStore for RedisClient {
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> StoreResult<()> {
        ensure_key(key)?;
        debug!(key = %mask_key(key), ttl_seconds = ?ttl_seconds, "Setting key");

        self.execute_with_retry("SET", |mut conn| {
            let mut cmd = redis::cmd("SET");
            cmd.arg(key).arg(value);
            if let Some(ttl) = ttl_seconds {
                cmd.arg("EX").arg(ttl);
            }
            Box::pin(async move { cmd.query_async::<_, ()>(&mut conn).await })
        })
        .await
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        ensure_key(key)?;
        debug!(key = %mask_key(key), "Getting key");

        self.execute_with_retry("GET", |mut conn| {
            let key = key.to_string();
            Box::pin(async move { conn.get::<_, Option<String>>(key).await })
        })
        .await
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        ensure_key(key)?;

        let deleted_count = self
            .execute_with_retry("DEL", |mut conn| {
                let key = key.to_string();
                Box::pin(async move { conn.del::<_, i64>(key).await })
            })
            .await?;

        debug!(key = %mask_key(key), deleted = deleted_count > 0, "Deleted key");
        Ok(deleted_count > 0)
    }

    async fn increment(&self, key: &str) -> StoreResult<i64> {
        ensure_key(key)?;

        // INCR is not idempotent, a retry could count one request twice
        let count = self
            .execute("INCR", 1, |mut conn| {
                let key = key.to_string();
                Box::pin(async move { conn.incr::<_, _, i64>(key, 1).await })
            })
            .await?;

        debug!(key = %mask_key(key), count = count, "Incremented counter");
        Ok(count)
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> StoreResult<()> {
        ensure_key(key)?;

        let applied = self
            .execute_with_retry("EXPIRE", |mut conn| {
                let mut cmd = redis::cmd("EXPIRE");
                cmd.arg(key).arg(ttl_seconds);
                Box::pin(async move { cmd.query_async::<_, i64>(&mut conn).await })
            })
            .await?;

        if applied == 0 {
            debug!(key = %mask_key(key), "Expire skipped, key no longer exists");
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        ensure_key(key)?;

        self.execute_with_retry("EXISTS", |mut conn| {
            let key = key.to_string();
            Box::pin(async move { conn.exists::<_, bool>(key).await })
        })
        .await
    }

    async fn ttl(&self, key: &str) -> StoreResult<Option<u64>> {
        ensure_key(key)?;

        let ttl = self
            .execute_with_retry("TTL", |mut conn| {
                let key = key.to_string();
                Box::pin(async move { conn.ttl::<_, i64>(key).await })
            })
            .await?;

        // -1: no expiry, -2: missing
        Ok(u64::try_from(ttl).ok())
    }

    /// Check if the Redis connection is healthy
    ///
    /// Performs a PING command to verify connectivity.
    async fn health_check(&self) -> StoreResult<bool> {
        debug!("Performing Redis health check");

        let response = self
            .execute_with_retry("PING", |mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await?;

        if response == "PONG" {
            debug!("Redis health check passed");
            Ok(true)
        } else {
            warn!("Redis health check returned unexpected response: {}", response);
            Ok(false)
        }
    }
}

fn next_delay(delay: u64) -> u64 {
    delay.saturating_mul(2).min(MAX_BACKOFF_MS)
}

/// Check if a Redis error is transient and the operation should be retried
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Mask sensitive parts of Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        if let Some(proto_end) = url.find("://") {
            let proto = &url[..proto_end + 3];
            let host_part = &url[at_pos..];
            return format!("{}****{}", proto, host_part);
        }
    }
    url.to_string()
}

/// Mask the subject embedded in a key (everything after the last `:`)
pub(crate) fn mask_key(key: &str) -> String {
    match key.rsplit_once(':') {
        Some((prefix, subject)) => format!("{}:{}", prefix, mask_subject(subject)),
        None => mask_subject(key),
    }
}
