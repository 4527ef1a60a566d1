//! Registered OAuth2 client records.

use serde::{Deserialize, Serialize};
use warden_kv::HashRecord;

use crate::entity::{Entity, EntityKind, SecondaryKeyed};
use crate::types::require_field;
use crate::AuthResult;

/// One registered client.
///
/// Clients are keyed internally by `id`; the human-facing `client_id` is
/// registered as a secondary lookup key on save (`client:{clientId}` → id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Internal identifier, the storage key.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Public client identifier presented in authorization requests.
    #[serde(rename = "clientId")]
    pub client_id: String,

    /// Client secret. Stored as provisioned; hashing policy belongs to the
    /// caller.
    #[serde(rename = "clientSecret")]
    pub client_secret: String,

    /// Whether the client skips the interactive consent step.
    #[serde(rename = "trustedClient", default)]
    pub trusted: bool,
}

impl ClientRecord {
    /// Creates an untrusted client.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            trusted: false,
        }
    }

    /// Marks the client as exempt from interactive consent.
    #[must_use]
    pub fn with_trusted(mut self, trusted: bool) -> Self {
        self.trusted = trusted;
        self
    }

    /// Returns `true` if the client skips interactive consent.
    #[must_use]
    pub fn is_trusted(&self) -> bool {
        self.trusted
    }
}

impl Entity for ClientRecord {
    const KIND: EntityKind = EntityKind::Client;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_record(&self) -> HashRecord {
        HashRecord::new(self.id.as_str())
            .with_field("name", self.name.as_str())
            .with_field("clientId", self.client_id.as_str())
            .with_field("clientSecret", self.client_secret.as_str())
            .with_field("trustedClient", if self.trusted { "true" } else { "false" })
    }

    fn from_record(record: &HashRecord) -> AuthResult<Self> {
        Ok(Self {
            id: require_field(record, "id")?,
            name: require_field(record, "name")?,
            client_id: require_field(record, "clientId")?,
            client_secret: require_field(record, "clientSecret")?,
            // Records written before the flag existed read as untrusted.
            trusted: record.get("trustedClient") == Some("true"),
        })
    }

    fn secondary_entry(&self) -> Option<(String, String)> {
        Some((Self::secondary_key(&self.client_id), self.id.clone()))
    }
}

impl SecondaryKeyed for ClientRecord {
    fn secondary_key(value: &str) -> String {
        format!("client:{value}")
    }
}
