//! Cache module for key-value storage
//!
//! Provides the Redis client used in production and an in-memory store with
//! the same expiry semantics for development and tests.

pub mod memory_store;
pub mod redis_client;


pub use memory_store::MemoryStore;
pub use redis_client::RedisClient;

// Re-export commonly used types
pub use otp_shared::CacheConfig;
