use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{Connection, Pool, PoolConfig};
use redis::{AsyncCommands, SetExpiry, SetOptions};
use warden_kv::{HashRecord, KeyValueStore, KvError, KvResult};

use crate::RedisConfig;

/// Redis implementation of the key-value contract.
///
/// Connections are taken from a deadpool pool per operation and returned on
/// drop. Unlike the repositories built on top, this layer never swallows
/// failures: every Redis error surfaces as a [`KvError`].
#[derive(Clone)]
pub struct RedisKv {
    pool: Pool,
}

impl RedisKv {
    /// Creates a backend over an existing pool.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Builds a pool from `config` and probes one connection.
    ///
    /// The probe makes a misconfigured URL fail at startup instead of on the
    /// first request.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::Connection`] if the pool cannot be created or the
    /// probe connection fails.
    pub async fn connect(config: &RedisConfig) -> KvResult<Self> {
        let mut redis_config = deadpool_redis::Config::from_url(&config.url);
        let pool_config = redis_config.pool.get_or_insert_with(PoolConfig::default);
        pool_config.max_size = config.pool_size;
        pool_config.timeouts.wait = Some(Duration::from_millis(config.timeout_ms));
        pool_config.timeouts.create = Some(Duration::from_millis(config.timeout_ms));
        pool_config.timeouts.recycle = Some(Duration::from_millis(config.timeout_ms));

        let pool = redis_config
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .map_err(|e| KvError::connection(format!("failed to create Redis pool: {e}")))?;

        let _probe = pool
            .get()
            .await
            .map_err(|e| KvError::connection(e.to_string()))?;
        tracing::info!(url = %config.url, pool_size = config.pool_size, "connected to Redis");

        Ok(Self { pool })
    }

    /// Returns the underlying pool.
    #[must_use]
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    async fn conn(&self) -> KvResult<Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| KvError::connection(e.to_string()))
    }
}

fn command_error(err: redis::RedisError) -> KvError {
    if err.is_io_error() || err.is_connection_refusal() || err.is_timeout() {
        KvError::connection(err.to_string())
    } else {
        KvError::backend(err.to_string())
    }
}

#[async_trait]
impl KeyValueStore for RedisKv {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let mut conn = self.conn().await?;
        let value: Option<String> = conn.get(key).await.map_err(command_error)?;
        tracing::debug!(key = %key, hit = value.is_some(), "GET");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        let mut conn = self.conn().await?;
        // KEEPTTL: an armed expiry keeps running across overwrites.
        let options = SetOptions::default().with_expiration(SetExpiry::KEEPTTL);
        conn.set_options::<_, _, ()>(key, value, options)
            .await
            .map_err(command_error)
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<(), KvError> {
        let mut conn = self.conn().await?;
        // Single SET ... EX, value and deadline land together. EX 0 is
        // invalid, so sub-second TTLs round up to one second.
        let ttl_secs = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(command_error)?;
        tracing::debug!(key = %key, ttl_secs, "SET with expiry");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, KvError> {
        let mut conn = self.conn().await?;
        let removed: i64 = conn.del(key).await.map_err(command_error)?;
        Ok(removed > 0)
    }

    async fn hash_get_all(&self, key: &str) -> Result<Option<HashRecord>, KvError> {
        let mut conn = self.conn().await?;
        let fields: HashMap<String, String> = conn.hgetall(key).await.map_err(command_error)?;
        // HGETALL on a missing key returns an empty map.
        if fields.is_empty() {
            return Ok(None);
        }
        Ok(Some(fields.into_iter().collect()))
    }

    async fn hash_get_field(&self, key: &str, field: &str) -> Result<Option<String>, KvError> {
        let mut conn = self.conn().await?;
        conn.hget(key, field).await.map_err(command_error)
    }

    async fn hash_set_fields(&self, record: &HashRecord) -> Result<(), KvError> {
        let id = record.id().ok_or(KvError::MissingId)?.to_string();
        let pairs: Vec<(&str, &str)> = record.iter().collect();

        let mut conn = self.conn().await?;
        conn.hset_multiple::<_, _, _, ()>(&id, &pairs)
            .await
            .map_err(command_error)
    }

    async fn set_add(&self, set: &str, member: &str) -> Result<bool, KvError> {
        let mut conn = self.conn().await?;
        let added: i64 = conn.sadd(set, member).await.map_err(command_error)?;
        Ok(added > 0)
    }

    async fn set_remove(&self, set: &str, member: &str) -> Result<bool, KvError> {
        let mut conn = self.conn().await?;
        let removed: i64 = conn.srem(set, member).await.map_err(command_error)?;
        Ok(removed > 0)
    }

    async fn set_members(&self, set: &str) -> Result<Vec<String>, KvError> {
        let mut conn = self.conn().await?;
        conn.smembers(set).await.map_err(command_error)
    }
}
