//! Redis key-value backend for the Warden credential store.
//!
//! This crate implements the `KeyValueStore` trait from `warden-kv` on top of
//! a Redis connection pool. It is the production backend: hash records map to
//! Redis hashes, membership sets to Redis sets, and the atomic write+expire
//! to a single `SET ... EX`.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use warden_kv::DynKv;
//! use warden_kv_redis::{RedisConfig, RedisKv};
//!
//! let config = RedisConfig {
//!     url: "redis://localhost:6379".to_string(),
//!     ..RedisConfig::default()
//! };
//! let kv: DynKv = Arc::new(RedisKv::connect(&config).await?);
//! ```

mod storage;

// Re-export the contract for convenience
pub use warden_kv::{DynKv, HashRecord, KeyValueStore, KvError, KvResult};

pub use storage::RedisKv;

use serde::{Deserialize, Serialize};

/// Redis connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL (e.g., "redis://localhost:6379")
    #[serde(default = "default_redis_url")]
    pub url: String,

    /// Connection pool size
    #[serde(default = "default_redis_pool_size")]
    pub pool_size: usize,

    /// Connection timeout in milliseconds
    #[serde(default = "default_redis_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_redis_pool_size() -> usize {
    10
}

fn default_redis_timeout_ms() -> u64 {
    5000
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            pool_size: default_redis_pool_size(),
            timeout_ms: default_redis_timeout_ms(),
        }
    }
}
