//! Refresh-token records.

use serde::{Deserialize, Serialize};
use warden_kv::HashRecord;

use crate::credential::extract_credential_id;
use crate::entity::{CredentialEntity, Entity, EntityKind};
use crate::types::{DEFAULT_SCOPE, require_field};
use crate::AuthResult;

/// One issued refresh token. Refresh tokens carry no expiry; they live
/// until revoked or rotated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
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
}

impl RefreshTokenRecord {
    /// Creates a record with the default scope.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            client_id: client_id.into(),
            scope: DEFAULT_SCOPE.to_string(),
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
    ///
    /// [`AuthError::MalformedCredential`]: crate::AuthError::MalformedCredential
    pub fn from_credential(
        credential: &str,
        user_id: impl Into<String>,
        client_id: impl Into<String>,
    ) -> AuthResult<Self> {
        let id = extract_credential_id(credential)?;
        Ok(Self::new(id, user_id, client_id))
    }
}

impl Entity for RefreshTokenRecord {
    const KIND: EntityKind = EntityKind::RefreshToken;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_record(&self) -> HashRecord {
        HashRecord::new(self.id.as_str())
            .with_field("userID", self.user_id.as_str())
            .with_field("clientID", self.client_id.as_str())
            .with_field("scope", self.scope.as_str())
    }

    fn from_record(record: &HashRecord) -> AuthResult<Self> {
        Ok(Self {
            id: require_field(record, "id")?,
            user_id: require_field(record, "userID")?,
            client_id: require_field(record, "clientID")?,
            scope: record.get("scope").unwrap_or(DEFAULT_SCOPE).to_string(),
        })
    }
}

impl CredentialEntity for RefreshTokenRecord {}
