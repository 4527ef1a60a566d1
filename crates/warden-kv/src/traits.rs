//! Storage trait for the key-value contract.
//!
//! This module defines the backend primitives that all key-value backends must
//! implement.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::KvError;
use crate::record::HashRecord;

/// The backend primitives every key-value store must provide.
///
/// Three families of operations share one keyspace: scalar strings, hash
/// records keyed by their `id` field, and unordered membership sets.
/// Implementations must be thread-safe (`Send + Sync`); every operation is
/// asynchronous and may fail with a backend error.
///
/// # Example
///
/// ```ignore
/// use warden_kv::{KeyValueStore, KvResult};
///
/// async fn resolve(kv: &dyn KeyValueStore, key: &str) -> KvResult<String> {
///     kv.get(key)
///         .await?
///         .ok_or_else(|| warden_kv::KvError::backend("dangling index entry"))
/// }
/// ```
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    // ==================== Scalar Operations ====================

    /// Reads the scalar value stored at `key`.
    ///
    /// Returns `None` if the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error only for backend failures, not for missing keys.
    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Overwrites the scalar value at `key`.
    ///
    /// An expiry already armed on the key is left in place, so overwriting a
    /// TTL-bound record does not extend its life. Use [`set_with_expiry`] to
    /// arm or re-arm a deadline.
    ///
    /// [`set_with_expiry`]: KeyValueStore::set_with_expiry
    ///
    /// # Errors
    ///
    /// Returns an error for backend failures.
    async fn set(&self, key: &str, value: &str) -> Result<(), KvError>;

    /// Writes the scalar value at `key` and arms an expiry, atomically.
    ///
    /// Value and deadline land in one backend write; there is no window in
    /// which the value exists without its expiry.
    ///
    /// # Errors
    ///
    /// Returns an error for backend failures.
    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<(), KvError>;

    /// Deletes the value stored at `key`, scalar or hash.
    ///
    /// # Returns
    ///
    /// `true` if a value existed and was removed, `false` if the key was
    /// already absent.
    ///
    /// # Errors
    ///
    /// Returns an error for backend failures.
    async fn delete(&self, key: &str) -> Result<bool, KvError>;

    // ==================== Hash Records ====================

    /// Reads the full hash record stored under `key`.
    ///
    /// Returns `None` when the key holds nothing; an empty hash does not
    /// exist as far as this contract is concerned.
    ///
    /// # Errors
    ///
    /// Returns an error only for backend failures.
    async fn hash_get_all(&self, key: &str) -> Result<Option<HashRecord>, KvError>;

    /// Reads a single field of the hash record stored under `key`.
    ///
    /// Returns `None` if the key or the field is absent.
    ///
    /// # Errors
    ///
    /// Returns an error only for backend failures.
    async fn hash_get_field(&self, key: &str, field: &str) -> Result<Option<String>, KvError>;

    /// Writes all fields of `record` under the record's own `id`.
    ///
    /// Existing fields with the same names are overwritten; other fields are
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::MissingId`] before touching the backend if the
    /// record's `id` field is absent or empty. Returns an error for backend
    /// failures.
    async fn hash_set_fields(&self, record: &HashRecord) -> Result<(), KvError>;

    // ==================== Membership Sets ====================

    /// Adds `member` to the set stored at `set`.
    ///
    /// # Returns
    ///
    /// `true` if the member was newly added, `false` if it was already
    /// present.
    ///
    /// # Errors
    ///
    /// Returns an error for backend failures.
    async fn set_add(&self, set: &str, member: &str) -> Result<bool, KvError>;

    /// Removes `member` from the set stored at `set`.
    ///
    /// # Returns
    ///
    /// `true` if the member was present and removed, `false` otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error for backend failures.
    async fn set_remove(&self, set: &str, member: &str) -> Result<bool, KvError>;

    /// Returns all members of the set stored at `set`, in no particular
    /// order. An absent set reads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error for backend failures.
    async fn set_members(&self, set: &str) -> Result<Vec<String>, KvError>;
}
