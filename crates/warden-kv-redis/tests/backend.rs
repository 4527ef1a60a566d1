//! Integration tests for the Redis backend.
//!
//! Tests use testcontainers to spin up a real Redis instance, so they are
//! ignored by default; run them explicitly where a container runtime exists:
//!
//! ```text
//! cargo test -p warden-kv-redis -- --ignored
//! ```

use std::time::Duration;

use redis::AsyncCommands;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::redis::Redis;
use tokio::sync::OnceCell;
use warden_kv::{HashRecord, KeyValueStore};
use warden_kv_redis::{RedisConfig, RedisKv};

// Shared Redis container for all tests
static SHARED_REDIS: OnceCell<(ContainerAsync<Redis>, String)> = OnceCell::const_new();

/// Get or create the shared Redis container
async fn get_redis_url() -> String {
    let (_, url) = SHARED_REDIS
        .get_or_init(|| async {
            let container = Redis::default()
                .start()
                .await
                .expect("start redis container");

            let host_port = container.get_host_port_ipv4(6379).await.expect("get port");
            let url = format!("redis://127.0.0.1:{}", host_port);

            (container, url)
        })
        .await;

    url.clone()
}

async fn connect() -> RedisKv {
    let config = RedisConfig {
        url: get_redis_url().await,
        ..RedisConfig::default()
    };
    RedisKv::connect(&config).await.expect("connect to redis")
}

#[tokio::test]
#[ignore = "requires a container runtime"]
async fn test_scalar_roundtrip_and_delete() {
    let kv = connect().await;

    kv.set("it:client:abc123", "client:1").await.unwrap();
    assert_eq!(
        kv.get("it:client:abc123").await.unwrap().as_deref(),
        Some("client:1")
    );

    assert!(kv.delete("it:client:abc123").await.unwrap());
    assert!(!kv.delete("it:client:abc123").await.unwrap());
    assert_eq!(kv.get("it:client:abc123").await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires a container runtime"]
async fn test_plain_set_keeps_ttl_running() {
    let kv = connect().await;

    kv.set_with_expiry("it:txn:authorize:abc", "v1", Duration::from_secs(300))
        .await
        .unwrap();
    kv.set("it:txn:authorize:abc", "v2").await.unwrap();

    assert_eq!(
        kv.get("it:txn:authorize:abc").await.unwrap().as_deref(),
        Some("v2")
    );

    let mut conn = kv.pool().get().await.unwrap();
    let ttl: i64 = conn.ttl("it:txn:authorize:abc").await.unwrap();
    assert!(ttl > 0, "overwrite must not clear the expiry, ttl = {ttl}");
}

#[tokio::test]
#[ignore = "requires a container runtime"]
async fn test_set_with_expiry_expires() {
    let kv = connect().await;

    kv.set_with_expiry("it:short-lived", "v", Duration::from_secs(1))
        .await
        .unwrap();
    assert!(kv.get("it:short-lived").await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(kv.get("it:short-lived").await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires a container runtime"]
async fn test_hash_record_roundtrip() {
    let kv = connect().await;

    let record = HashRecord::new("it:tok-1")
        .with_field("userID", "user:1")
        .with_field("clientID", "client:1")
        .with_field("scope", "offline_access");
    kv.hash_set_fields(&record).await.unwrap();

    let stored = kv.hash_get_all("it:tok-1").await.unwrap().unwrap();
    assert_eq!(stored.id(), Some("it:tok-1"));
    assert_eq!(stored.get("userID"), Some("user:1"));
    assert_eq!(stored.get("scope"), Some("offline_access"));

    assert_eq!(
        kv.hash_get_field("it:tok-1", "clientID")
            .await
            .unwrap()
            .as_deref(),
        Some("client:1")
    );
    assert_eq!(kv.hash_get_field("it:tok-1", "nope").await.unwrap(), None);
    assert_eq!(kv.hash_get_all("it:tok-404").await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires a container runtime"]
async fn test_hash_set_requires_id() {
    let kv = connect().await;

    let record = HashRecord::default().with_field("userID", "user:1");
    let err = kv.hash_set_fields(&record).await.unwrap_err();
    assert!(err.is_missing_id());
}

#[tokio::test]
#[ignore = "requires a container runtime"]
async fn test_set_membership() {
    let kv = connect().await;

    assert!(kv.set_add("it:tokens", "tok-1").await.unwrap());
    assert!(!kv.set_add("it:tokens", "tok-1").await.unwrap());
    assert!(kv.set_add("it:tokens", "tok-2").await.unwrap());

    let mut members = kv.set_members("it:tokens").await.unwrap();
    members.sort();
    assert_eq!(members, vec!["tok-1", "tok-2"]);

    assert!(kv.set_remove("it:tokens", "tok-1").await.unwrap());
    assert!(!kv.set_remove("it:tokens", "tok-1").await.unwrap());
    assert_eq!(kv.set_members("it:missing").await.unwrap().len(), 0);

    kv.set_remove("it:tokens", "tok-2").await.unwrap();
}
