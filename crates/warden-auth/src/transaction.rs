//! Ephemeral interactive-authorization transactions.
//!
//! When an authorization flow pauses for user interaction (login page,
//! consent screen), the in-flight protocol state is parked here under a
//! short random id that rides the redirect instead of the state itself.
//! Entries are written with a time-to-live in a single backend operation,
//! so an abandoned flow cleans itself up.
//!
//! Clients are stored by reference, not by value: a [`ClientSerializer`]
//! reduces the application's client representation to a compact JSON
//! handle on the way in and resolves it back on the way out. A handle
//! that no longer resolves (the client was deleted mid-flow) invalidates
//! the transaction.

use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use warden_kv::DynKv;

use crate::config::TransactionConfig;
use crate::error::AuthError;
use crate::AuthResult;

/// Converts a client between its in-memory form and a stored JSON handle.
///
/// The usual implementation serializes to the client's database id and
/// deserializes through a client lookup, so the transaction always sees
/// the client's current state rather than a snapshot.
#[async_trait]
pub trait ClientSerializer: Send + Sync {
    /// In-memory client representation.
    type Client: Send + Sync;

    /// Reduces a client to the JSON form embedded in a stored transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be serialized.
    async fn serialize_client(&self, client: &Self::Client) -> AuthResult<Value>;

    /// Resolves a stored handle back to a client.
    ///
    /// `Ok(None)` means the handle is well-formed but no longer resolves
    /// to a live client; the transaction holding it will be invalidated.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed handles or lookup failures.
    async fn deserialize_client(&self, value: &Value) -> AuthResult<Option<Self::Client>>;
}

/// A pending interactive authorization.
#[derive(Debug, Clone)]
pub struct Transaction<C> {
    /// Server-generated identifier, also the round-trip parameter value.
    pub transaction_id: String,
    /// The client on whose behalf authorization was requested.
    pub client: C,
    /// Protocol state carried across the interaction (response type,
    /// redirect URI, requested scope, and whatever the flow adds).
    pub state: Map<String, Value>,
}

/// Wire form: the client handle under `client`, the protocol state
/// flattened beside it.
#[derive(Serialize, Deserialize)]
struct StoredTransaction {
    client: Value,
    #[serde(flatten)]
    state: Map<String, Value>,
}

/// Store for pending interactive authorizations.
pub struct TransactionStore<S: ClientSerializer> {
    kv: DynKv,
    serializer: S,
    config: TransactionConfig,
}

impl<S: ClientSerializer> TransactionStore<S> {
    /// Creates a transaction store over the given backend.
    #[must_use]
    pub fn new(kv: DynKv, serializer: S, config: TransactionConfig) -> Self {
        Self {
            kv,
            serializer,
            config,
        }
    }

    /// Parks a new transaction and returns its generated id.
    ///
    /// The payload and its time-to-live land in one backend write; there
    /// is no window where the entry exists without an expiry.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be serialized or the write
    /// fails.
    pub async fn store(
        &self,
        client: &S::Client,
        state: Map<String, Value>,
    ) -> AuthResult<String> {
        let transaction_id = self.generate_id();
        let stored = StoredTransaction {
            client: self.serializer.serialize_client(client).await?,
            state,
        };
        let payload = serde_json::to_string(&stored)
            .map_err(|e| AuthError::serialization(e.to_string()))?;

        let key = self.config.storage_key(&transaction_id);
        self.kv
            .set_with_expiry(&key, &payload, self.config.ttl)
            .await?;

        tracing::debug!(transaction_id = %transaction_id, ttl = ?self.config.ttl, "stored authorization transaction");
        Ok(transaction_id)
    }

    /// Loads the transaction for a round-tripped id.
    ///
    /// Takes the raw request parameter, so absence is handled here:
    /// `None` or an empty string fails with [`AuthError::MissingParameter`]
    /// naming the configured parameter. An id that resolves to nothing
    /// (expired, removed, or never issued) fails with
    /// [`AuthError::TransactionNotFound`]. A transaction whose client
    /// handle no longer resolves is deleted on the spot and fails with
    /// [`AuthError::UnauthorizedClient`].
    ///
    /// # Errors
    ///
    /// As above, plus serialization and backend failures.
    pub async fn load(&self, transaction_id: Option<&str>) -> AuthResult<Transaction<S::Client>> {
        let transaction_id = transaction_id
            .filter(|tid| !tid.is_empty())
            .ok_or_else(|| AuthError::missing_parameter(&self.config.transaction_field))?;

        let key = self.config.storage_key(transaction_id);
        let Some(payload) = self.kv.get(&key).await? else {
            return Err(AuthError::transaction_not_found(transaction_id));
        };

        let stored: StoredTransaction = serde_json::from_str(&payload)
            .map_err(|e| AuthError::serialization(e.to_string()))?;

        match self.serializer.deserialize_client(&stored.client).await? {
            Some(client) => Ok(Transaction {
                transaction_id: transaction_id.to_string(),
                client,
                state: stored.state,
            }),
            None => {
                // The client vanished while the flow was pending. Drop the
                // orphaned entry so retries fail fast as not-found.
                if let Err(error) = self.kv.delete(&key).await {
                    tracing::warn!(transaction_id = %transaction_id, error = %error, "failed to delete orphaned transaction");
                }
                Err(AuthError::UnauthorizedClient)
            }
        }
    }

    /// Overwrites a transaction's payload in place.
    ///
    /// The entry's remaining time-to-live keeps counting down; updating a
    /// transaction does not extend its life.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be serialized or the write
    /// fails.
    pub async fn update(&self, transaction: &Transaction<S::Client>) -> AuthResult<()> {
        let stored = StoredTransaction {
            client: self.serializer.serialize_client(&transaction.client).await?,
            state: transaction.state.clone(),
        };
        let payload = serde_json::to_string(&stored)
            .map_err(|e| AuthError::serialization(e.to_string()))?;

        let key = self.config.storage_key(&transaction.transaction_id);
        self.kv.set(&key, &payload).await?;
        Ok(())
    }

    /// Removes a completed or abandoned transaction.
    ///
    /// Removal is advisory: the entry expires on its own anyway, so
    /// backend failures are logged and swallowed and removal never fails.
    pub async fn remove(&self, transaction_id: &str) {
        let key = self.config.storage_key(transaction_id);
        if let Err(error) = self.kv.delete(&key).await {
            tracing::warn!(transaction_id = %transaction_id, error = %error, "failed to remove transaction");
        }
    }

    fn generate_id(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(self.config.id_length)
            .map(char::from)
            .collect()
    }
}
