//! Interactive-authorization journey over the in-memory backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use warden_auth::prelude::*;
use warden_kv_memory::MemoryKv;

/// Serializes clients to their database id and resolves them back through
/// the client repository, the usual wiring in an authorization server.
struct RepoClientSerializer {
    clients: Repository<ClientRecord>,
}

#[async_trait]
impl ClientSerializer for RepoClientSerializer {
    type Client = ClientRecord;

    async fn serialize_client(&self, client: &ClientRecord) -> AuthResult<Value> {
        Ok(Value::String(client.id.clone()))
    }

    async fn deserialize_client(&self, value: &Value) -> AuthResult<Option<ClientRecord>> {
        let id = value
            .as_str()
            .ok_or_else(|| AuthError::serialization("client handle is not a string"))?;
        self.clients.find_by_id(id).await
    }
}

fn store_with(config: StoreConfig) -> AuthStore {
    AuthStore::with_config(Arc::new(MemoryKv::new()), config)
}

fn transactions(store: &AuthStore) -> TransactionStore<RepoClientSerializer> {
    store.transactions(RepoClientSerializer {
        clients: store.clients(),
    })
}

async fn seed_client(store: &AuthStore) -> ClientRecord {
    let client = ClientRecord::new("client:1", "Samplr", "abc123", "ssh-secret");
    store.clients().save(&client).await.unwrap();
    client
}

fn authorize_request() -> Map<String, Value> {
    let mut state = Map::new();
    state.insert("responseType".into(), Value::String("code".into()));
    state.insert(
        "redirectURI".into(),
        Value::String("https://app.example/cb".into()),
    );
    state.insert("scope".into(), Value::String("offline_access".into()));
    state
}

#[tokio::test]
async fn test_authorization_pauses_and_resumes() {
    let store = store_with(StoreConfig::default());
    let client = seed_client(&store).await;
    let txns = transactions(&store);

    // The flow pauses for login; its state parks under a fresh id.
    let tid = txns.store(&client, authorize_request()).await.unwrap();

    // The stored entry keys by the configured prefix and session key, and
    // holds the client by reference only.
    let key = store.config().transaction.storage_key(&tid);
    let payload = store.kv().get(&key).await.unwrap().unwrap();
    let document: Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(document.get("client"), Some(&Value::String("client:1".into())));
    assert_eq!(
        document.get("responseType"),
        Some(&Value::String("code".into()))
    );
    assert!(document.get("clientSecret").is_none());

    // The redirect comes back; the flow resumes with the live client.
    let mut txn = txns.load(Some(tid.as_str())).await.unwrap();
    assert_eq!(txn.client, client);
    assert_eq!(
        txn.state.get("redirectURI").and_then(Value::as_str),
        Some("https://app.example/cb")
    );

    // Login succeeded; the flow records the user and moves to consent.
    txn.state
        .insert("userID".into(), Value::String("user:1".into()));
    txns.update(&txn).await.unwrap();

    let resumed = txns.load(Some(tid.as_str())).await.unwrap();
    assert_eq!(resumed.state.get("userID").and_then(Value::as_str), Some("user:1"));

    // Consent granted; the transaction is finished and removed.
    txns.remove(&tid).await;
    assert!(txns.load(Some(tid.as_str())).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_error_paths_stay_distinguishable() {
    let store = store_with(StoreConfig::default());
    seed_client(&store).await;
    let txns = transactions(&store);

    // Request without the transaction parameter.
    let err = txns.load(None).await.unwrap_err();
    assert_eq!(err.oauth_error_code(), "invalid_request");
    assert!(matches!(err, AuthError::MissingParameter { ref name } if name == "transaction_id"));

    // Parameter present but the id was never issued.
    let err = txns.load(Some("deadbeef")).await.unwrap_err();
    assert_eq!(err.oauth_error_code(), "access_denied");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_client_deleted_mid_flow() {
    let store = store_with(StoreConfig::default());
    let client = seed_client(&store).await;
    let txns = transactions(&store);

    let tid = txns.store(&client, authorize_request()).await.unwrap();
    store.clients().delete_by_id(&client.id).await.unwrap();

    let err = txns.load(Some(tid.as_str())).await.unwrap_err();
    assert_eq!(err.oauth_error_code(), "unauthorized_client");

    // The orphaned entry was dropped with the first rejection.
    let key = store.config().transaction.storage_key(&tid);
    assert_eq!(store.kv().get(&key).await.unwrap(), None);
    assert!(txns.load(Some(tid.as_str())).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_abandoned_flow_expires() {
    let config = StoreConfig {
        transaction: TransactionConfig {
            ttl: Duration::from_millis(100),
            ..TransactionConfig::default()
        },
    };
    let store = store_with(config);
    let client = seed_client(&store).await;
    let txns = transactions(&store);

    let tid = txns.store(&client, authorize_request()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(250)).await;

    assert!(txns.load(Some(tid.as_str())).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_concurrent_transactions_do_not_collide() {
    let store = store_with(StoreConfig::default());
    let client = seed_client(&store).await;
    let txns = transactions(&store);

    let first = txns.store(&client, authorize_request()).await.unwrap();
    let mut second_state = authorize_request();
    second_state.insert("scope".into(), Value::String("admin".into()));
    let second = txns.store(&client, second_state).await.unwrap();

    assert_ne!(first, second);
    let first_txn = txns.load(Some(first.as_str())).await.unwrap();
    let second_txn = txns.load(Some(second.as_str())).await.unwrap();
    assert_eq!(
        first_txn.state.get("scope").and_then(Value::as_str),
        Some("offline_access")
    );
    assert_eq!(
        second_txn.state.get("scope").and_then(Value::as_str),
        Some("admin")
    );
}
