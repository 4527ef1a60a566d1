//! Access-token records.
//!
//! # Security Considerations
//!
//! The raw bearer string never reaches this type. Records hold the derived
//! identifier plus metadata, so a leaked backend exposes no usable
//! credential.

use serde::{Deserialize, Serialize};
use warden_kv::HashRecord;

use crate::credential::extract_credential_id;
use crate::entity::{CredentialEntity, Entity, EntityKind, ExpiringEntity};
use crate::error::AuthError;
use crate::types::{DEFAULT_SCOPE, now_unix_ms, require_field};
use crate::AuthResult;

/// One issued access token, keyed by its derived identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenRecord {
    /// Derived identifier, the storage key.
    pub id: String,

    /// Resource owner the token was issued to.
    #[serde(rename = "userID")]
    pub user_id: String,

    /// Client the token was issued through.
    #[serde(rename = "clientID")]
    pub client_id: String,

    /// Granted scope.
    pub scope: String,

    /// Expiry as epoch milliseconds.
    #[serde(rename = "expirationDate")]
    pub expires_at: i64,
}

impl AccessTokenRecord {
    /// Creates a record with the default scope.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        client_id: impl Into<String>,
        expires_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            client_id: client_id.into(),
            scope: DEFAULT_SCOPE.to_string(),
            expires_at,
        }
    }

    /// Replaces the default scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Creates a record keyed by the credential's extracted identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MalformedCredential`] if no identifier can be
    /// extracted.
    pub fn from_credential(
        credential: &str,
        user_id: impl Into<String>,
        client_id: impl Into<String>,
        expires_at: i64,
    ) -> AuthResult<Self> {
        let id = extract_credential_id(credential)?;
        Ok(Self::new(id, user_id, client_id, expires_at))
    }

    /// Returns `true` if the expiry is strictly in the past.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        now_unix_ms() > self.expires_at
    }
}

impl Entity for AccessTokenRecord {
    const KIND: EntityKind = EntityKind::AccessToken;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_record(&self) -> HashRecord {
        HashRecord::new(self.id.as_str())
            .with_field("userID", self.user_id.as_str())
            .with_field("clientID", self.client_id.as_str())
            .with_field("scope", self.scope.as_str())
            .with_field(Self::EXPIRY_FIELD, self.expires_at.to_string())
    }

    fn from_record(record: &HashRecord) -> AuthResult<Self> {
        let expires_at = require_field(record, Self::EXPIRY_FIELD)?;
        let expires_at = expires_at.parse::<i64>().map_err(|_| {
            AuthError::serialization(format!(
                "field '{}' is not an epoch-ms integer: {expires_at}",
                Self::EXPIRY_FIELD
            ))
        })?;

        Ok(Self {
            id: require_field(record, "id")?,
            user_id: require_field(record, "userID")?,
            client_id: require_field(record, "clientID")?,
            scope: record.get("scope").unwrap_or(DEFAULT_SCOPE).to_string(),
            expires_at,
        })
    }
}

impl CredentialEntity for AccessTokenRecord {}

impl ExpiringEntity for AccessTokenRecord {
    const EXPIRY_FIELD: &'static str = "expirationDate";
}
