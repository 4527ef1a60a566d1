//! Authorization-code records.
//!
//! Codes are single-use: the exchange that consumes one deletes it.

use serde::{Deserialize, Serialize};
use warden_kv::HashRecord;

use crate::credential::extract_credential_id;
use crate::entity::{CredentialEntity, Entity, EntityKind};
use crate::types::{DEFAULT_SCOPE, require_field};
use crate::AuthResult;

/// One issued authorization code, pinned to the redirect URI it was issued
/// for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationCodeRecord {
    /// Derived identifier, the storage key.
    pub id: String,

    /// Client the code was issued to.
    #[serde(rename = "clientID")]
    pub client_id: String,

    /// Redirect URI the code must be redeemed against.
    #[serde(rename = "redirectURI")]
    pub redirect_uri: String,

    /// Resource owner who approved the request.
    #[serde(rename = "userID")]
    pub user_id: String,

    /// Granted scope.
    pub scope: String,
}

impl AuthorizationCodeRecord {
    /// Creates a record with the default scope.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            user_id: user_id.into(),
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
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
        user_id: impl Into<String>,
    ) -> AuthResult<Self> {
        let id = extract_credential_id(credential)?;
        Ok(Self::new(id, client_id, redirect_uri, user_id))
    }
}

impl Entity for AuthorizationCodeRecord {
    const KIND: EntityKind = EntityKind::AuthorizationCode;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_record(&self) -> HashRecord {
        HashRecord::new(self.id.as_str())
            .with_field("clientID", self.client_id.as_str())
            .with_field("redirectURI", self.redirect_uri.as_str())
            .with_field("userID", self.user_id.as_str())
            .with_field("scope", self.scope.as_str())
    }

    fn from_record(record: &HashRecord) -> AuthResult<Self> {
        Ok(Self {
            id: require_field(record, "id")?,
            client_id: require_field(record, "clientID")?,
            redirect_uri: require_field(record, "redirectURI")?,
            user_id: require_field(record, "userID")?,
            scope: record.get("scope").unwrap_or(DEFAULT_SCOPE).to_string(),
        })
    }
}

impl CredentialEntity for AuthorizationCodeRecord {}
