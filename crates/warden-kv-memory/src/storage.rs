use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use warden_kv::{HashRecord, KeyValueStore, KvError};

/// One stored value, any of the three families the contract knows about.
#[derive(Debug, Clone)]
enum Value {
    Scalar(String),
    Hash(HashRecord),
    Set(HashSet<String>),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Hash(_) => "hash",
            Self::Set(_) => "set",
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    value: Value,
    expires_at: Option<Instant>,
}

impl Slot {
    fn live(value: Value) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|deadline| Instant::now() >= deadline)
    }
}

fn wrong_type(key: &str, want: &str, found: &Value) -> KvError {
    KvError::backend(format!(
        "wrong type for key '{key}': expected {want}, found {}",
        found.type_name()
    ))
}

/// In-memory key-value backend over a DashMap.
///
/// Matches the Redis backend's observable behavior: an empty hash does not
/// exist, accessing a key with the wrong operation family is a backend
/// error, and plain `set` keeps an already-armed expiry running.
#[derive(Debug, Default, Clone)]
pub struct MemoryKv {
    data: Arc<DashMap<String, Slot>>,
}

impl MemoryKv {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the key if its deadline has passed, so the caller can treat
    /// whatever remains in the map as live.
    fn purge_if_expired(&self, key: &str) {
        self.data.remove_if(key, |_, slot| slot.is_expired());
    }

    #[cfg(test)]
    fn force_expire(&self, key: &str) {
        if let Some(mut slot) = self.data.get_mut(key) {
            slot.expires_at = Some(Instant::now() - Duration::from_secs(1));
        }
    }

    #[cfg(test)]
    fn expiry_of(&self, key: &str) -> Option<Instant> {
        self.data.get(key).and_then(|slot| slot.expires_at)
    }
}

#[async_trait]
impl KeyValueStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        self.purge_if_expired(key);
        match self.data.get(key) {
            None => Ok(None),
            Some(slot) => match &slot.value {
                Value::Scalar(value) => Ok(Some(value.clone())),
                other => Err(wrong_type(key, "scalar", other)),
            },
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        self.purge_if_expired(key);
        match self.data.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                // Overwrite in place; the armed expiry keeps running.
                occupied.get_mut().value = Value::Scalar(value.to_string());
            }
            Entry::Vacant(vacant) => {
                vacant.insert(Slot::live(Value::Scalar(value.to_string())));
            }
        }
        Ok(())
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<(), KvError> {
        self.data.insert(
            key.to_string(),
            Slot {
                value: Value::Scalar(value.to_string()),
                expires_at: Some(Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, KvError> {
        self.purge_if_expired(key);
        Ok(self.data.remove(key).is_some())
    }

    async fn hash_get_all(&self, key: &str) -> Result<Option<HashRecord>, KvError> {
        self.purge_if_expired(key);
        match self.data.get(key) {
            None => Ok(None),
            Some(slot) => match &slot.value {
                Value::Hash(record) => Ok(Some(record.clone())),
                other => Err(wrong_type(key, "hash", other)),
            },
        }
    }

    async fn hash_get_field(&self, key: &str, field: &str) -> Result<Option<String>, KvError> {
        self.purge_if_expired(key);
        match self.data.get(key) {
            None => Ok(None),
            Some(slot) => match &slot.value {
                Value::Hash(record) => Ok(record.get(field).map(str::to_string)),
                other => Err(wrong_type(key, "hash", other)),
            },
        }
    }

    async fn hash_set_fields(&self, record: &HashRecord) -> Result<(), KvError> {
        let id = record.id().ok_or(KvError::MissingId)?;
        self.purge_if_expired(id);
        match self.data.entry(id.to_string()) {
            Entry::Occupied(mut occupied) => match &mut occupied.get_mut().value {
                Value::Hash(existing) => {
                    for (name, value) in record.iter() {
                        existing.insert(name, value);
                    }
                }
                other => return Err(wrong_type(id, "hash", other)),
            },
            Entry::Vacant(vacant) => {
                vacant.insert(Slot::live(Value::Hash(record.clone())));
            }
        }
        Ok(())
    }

    async fn set_add(&self, set: &str, member: &str) -> Result<bool, KvError> {
        self.purge_if_expired(set);
        match self.data.entry(set.to_string()) {
            Entry::Occupied(mut occupied) => match &mut occupied.get_mut().value {
                Value::Set(members) => Ok(members.insert(member.to_string())),
                other => Err(wrong_type(set, "set", other)),
            },
            Entry::Vacant(vacant) => {
                let mut members = HashSet::new();
                members.insert(member.to_string());
                vacant.insert(Slot::live(Value::Set(members)));
                Ok(true)
            }
        }
    }

    async fn set_remove(&self, set: &str, member: &str) -> Result<bool, KvError> {
        self.purge_if_expired(set);
        match self.data.entry(set.to_string()) {
            Entry::Occupied(mut occupied) => {
                let (removed, now_empty) = match &mut occupied.get_mut().value {
                    Value::Set(members) => {
                        let removed = members.remove(member);
                        (removed, members.is_empty())
                    }
                    other => return Err(wrong_type(set, "set", other)),
                };
                if now_empty {
                    // An empty set does not exist, same as on the backend.
                    occupied.remove();
                }
                Ok(removed)
            }
            Entry::Vacant(_) => Ok(false),
        }
    }

    async fn set_members(&self, set: &str) -> Result<Vec<String>, KvError> {
        self.purge_if_expired(set);
        match self.data.get(set) {
            None => Ok(Vec::new()),
            Some(slot) => match &slot.value {
                Value::Set(members) => Ok(members.iter().cloned().collect()),
                other => Err(wrong_type(set, "set", other)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scalar_roundtrip() {
        let kv = MemoryKv::new();
        kv.set("client:abc123", "client:1").await.unwrap();
        assert_eq!(
            kv.get("client:abc123").await.unwrap().as_deref(),
            Some("client:1")
        );
        assert_eq!(kv.get("client:missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let kv = MemoryKv::new();
        kv.set("k", "v").await.unwrap();
        assert!(kv.delete("k").await.unwrap());
        assert!(!kv.delete("k").await.unwrap());
        assert_eq!(kv.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_key_reads_absent_and_is_purged() {
        let kv = MemoryKv::new();
        kv.set_with_expiry("txn:authorize:abc", "{}", Duration::from_secs(300))
            .await
            .unwrap();
        assert!(kv.get("txn:authorize:abc").await.unwrap().is_some());

        kv.force_expire("txn:authorize:abc");
        assert_eq!(kv.get("txn:authorize:abc").await.unwrap(), None);
        assert!(!kv.data.contains_key("txn:authorize:abc"));
        // A dead key deletes as if it never existed.
        assert!(!kv.delete("txn:authorize:abc").await.unwrap());
    }

    #[tokio::test]
    async fn test_plain_set_keeps_expiry_running() {
        let kv = MemoryKv::new();
        kv.set_with_expiry("txn:authorize:abc", "v1", Duration::from_secs(300))
            .await
            .unwrap();
        let before = kv.expiry_of("txn:authorize:abc");
        assert!(before.is_some());

        kv.set("txn:authorize:abc", "v2").await.unwrap();
        assert_eq!(kv.expiry_of("txn:authorize:abc"), before);
        assert_eq!(
            kv.get("txn:authorize:abc").await.unwrap().as_deref(),
            Some("v2")
        );
    }

    #[tokio::test]
    async fn test_set_with_expiry_rearms() {
        let kv = MemoryKv::new();
        kv.set("k", "forever").await.unwrap();
        assert_eq!(kv.expiry_of("k"), None);

        kv.set_with_expiry("k", "bounded", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(kv.expiry_of("k").is_some());
    }

    #[tokio::test]
    async fn test_hash_set_merges_fields() {
        let kv = MemoryKv::new();
        kv.hash_set_fields(&HashRecord::new("tok-1").with_field("userID", "user:1"))
            .await
            .unwrap();
        kv.hash_set_fields(
            &HashRecord::new("tok-1")
                .with_field("userID", "user:2")
                .with_field("scope", "offline_access"),
        )
        .await
        .unwrap();

        let record = kv.hash_get_all("tok-1").await.unwrap().unwrap();
        assert_eq!(record.get("userID"), Some("user:2"));
        assert_eq!(record.get("scope"), Some("offline_access"));
        assert_eq!(
            kv.hash_get_field("tok-1", "scope").await.unwrap().as_deref(),
            Some("offline_access")
        );
        assert_eq!(kv.hash_get_field("tok-1", "nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_hash_set_requires_id() {
        let kv = MemoryKv::new();
        let record = HashRecord::default().with_field("userID", "user:1");
        let err = kv.hash_set_fields(&record).await.unwrap_err();
        assert!(err.is_missing_id());
        assert_eq!(kv.hash_get_all("user:1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_hash_reads_absent() {
        let kv = MemoryKv::new();
        assert_eq!(kv.hash_get_all("tok-404").await.unwrap(), None);
        assert_eq!(kv.hash_get_field("tok-404", "scope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_membership() {
        let kv = MemoryKv::new();
        assert!(kv.set_add("tokens", "tok-1").await.unwrap());
        assert!(!kv.set_add("tokens", "tok-1").await.unwrap());
        assert!(kv.set_add("tokens", "tok-2").await.unwrap());

        let mut members = kv.set_members("tokens").await.unwrap();
        members.sort();
        assert_eq!(members, vec!["tok-1", "tok-2"]);

        assert!(kv.set_remove("tokens", "tok-1").await.unwrap());
        assert!(!kv.set_remove("tokens", "tok-1").await.unwrap());
        assert!(!kv.set_remove("ghosts", "tok-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_set_reads_absent() {
        let kv = MemoryKv::new();
        assert_eq!(kv.set_members("tokens").await.unwrap(), Vec::<String>::new());

        kv.set_add("tokens", "tok-1").await.unwrap();
        kv.set_remove("tokens", "tok-1").await.unwrap();
        assert_eq!(kv.set_members("tokens").await.unwrap(), Vec::<String>::new());
        assert!(!kv.data.contains_key("tokens"));
    }

    #[tokio::test]
    async fn test_wrong_family_is_a_backend_error() {
        let kv = MemoryKv::new();
        kv.set("k", "v").await.unwrap();
        assert!(kv.hash_get_all("k").await.is_err());
        assert!(kv.set_add("k", "m").await.is_err());

        kv.hash_set_fields(&HashRecord::new("h").with_field("f", "v"))
            .await
            .unwrap();
        assert!(kv.get("h").await.is_err());
        assert!(kv.set_members("h").await.is_err());
    }
}
