//! Store configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for an authorization store.
///
/// Every field has a serde default, so an empty document (or a missing
/// section in a larger config file) yields the stock settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Interactive-authorization transaction settings.
    #[serde(default)]
    pub transaction: TransactionConfig,
}

/// Settings for ephemeral interactive-authorization transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionConfig {
    /// Prefix prepended to every transaction storage key.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Namespace segment between the prefix and the transaction id.
    #[serde(default = "default_session_key")]
    pub session_key: String,

    /// Request-parameter name that carries the transaction id.
    #[serde(default = "default_transaction_field")]
    pub transaction_field: String,

    /// Lifetime of a stored transaction (humantime format, e.g. `5m`).
    #[serde(default = "default_ttl", with = "humantime_serde")]
    pub ttl: Duration,

    /// Length of generated transaction ids, in characters.
    #[serde(default = "default_id_length")]
    pub id_length: usize,
}

fn default_key_prefix() -> String {
    "txn:".to_string()
}

fn default_session_key() -> String {
    "authorize".to_string()
}

fn default_transaction_field() -> String {
    "transaction_id".to_string()
}

fn default_ttl() -> Duration {
    Duration::from_secs(300)
}

fn default_id_length() -> usize {
    8
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            session_key: default_session_key(),
            transaction_field: default_transaction_field(),
            ttl: default_ttl(),
            id_length: default_id_length(),
        }
    }
}

impl TransactionConfig {
    /// Builds the storage key for a transaction id.
    #[must_use]
    pub fn storage_key(&self, transaction_id: &str) -> String {
        format!(
            "{}{}:{}",
            self.key_prefix, self.session_key, transaction_id
        )
    }
}
