//! Entity kinds and the trait family the generic repository is built over.
//!
//! Each persisted kind (credential or principal) implements [`Entity`] to
//! describe its membership set and its hash-record wire form. The marker
//! traits grant extra repository capabilities: [`CredentialEntity`] kinds
//! are addressed by an opaque bearer credential, [`ExpiringEntity`] kinds
//! can be swept, and [`SecondaryKeyed`] kinds carry a human-facing lookup
//! key beside their internal id.

use std::fmt;

use warden_kv::HashRecord;

use crate::AuthResult;

/// The five persisted entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Bearer access tokens.
    AccessToken,
    /// Long-lived refresh tokens.
    RefreshToken,
    /// Single-use authorization codes.
    AuthorizationCode,
    /// Registered OAuth2 clients.
    Client,
    /// Resource-owner accounts.
    User,
}

impl EntityKind {
    /// Name of the membership set holding this kind's live ids.
    #[must_use]
    pub const fn membership_set(self) -> &'static str {
        match self {
            Self::AccessToken => "tokens",
            Self::RefreshToken => "refresh:tokens",
            Self::AuthorizationCode => "codes",
            Self::Client => "clients",
            Self::User => "users",
        }
    }

    /// Stable label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => "access_token",
            Self::RefreshToken => "refresh_token",
            Self::AuthorizationCode => "authorization_code",
            Self::Client => "client",
            Self::User => "user",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record the generic repository can persist.
///
/// `to_record` and `from_record` define the kind's wire form; the record's
/// `id` field doubles as its storage key.
pub trait Entity: Sized + Send + Sync {
    /// Which kind this is; fixes the membership set.
    const KIND: EntityKind;

    /// The record's identifier (and storage key).
    fn id(&self) -> &str;

    /// Encodes this record into its stored hash form.
    fn to_record(&self) -> HashRecord;

    /// Decodes a stored hash back into a typed record.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Serialization`] when a required field is absent
    /// or unparseable.
    ///
    /// [`AuthError::Serialization`]: crate::AuthError::Serialization
    fn from_record(record: &HashRecord) -> AuthResult<Self>;

    /// Secondary lookup entry to register on save, `(key, id)`.
    ///
    /// Kinds without a secondary key return `None`, which is the default.
    fn secondary_entry(&self) -> Option<(String, String)> {
        None
    }
}

/// Kinds addressed by an opaque bearer credential rather than a plain id.
///
/// The repository derives the storage key by extracting the credential's
/// embedded identifier (see [`extract_credential_id`]).
///
/// [`extract_credential_id`]: crate::credential::extract_credential_id
pub trait CredentialEntity: Entity {}

/// Kinds whose records expire and can be swept.
pub trait ExpiringEntity: Entity {
    /// Hash field holding the epoch-ms expiry.
    const EXPIRY_FIELD: &'static str;
}

/// Kinds with a registered human-facing lookup key.
pub trait SecondaryKeyed: Entity {
    /// Derives the full secondary lookup key from the human-facing value,
    /// e.g. `client:{clientId}` or `user:{username}`.
    fn secondary_key(value: &str) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_sets() {
        assert_eq!(EntityKind::AccessToken.membership_set(), "tokens");
        assert_eq!(EntityKind::RefreshToken.membership_set(), "refresh:tokens");
        assert_eq!(EntityKind::AuthorizationCode.membership_set(), "codes");
        assert_eq!(EntityKind::Client.membership_set(), "clients");
        assert_eq!(EntityKind::User.membership_set(), "users");
    }

    #[test]
    fn test_display() {
        assert_eq!(EntityKind::AccessToken.to_string(), "access_token");
        assert_eq!(EntityKind::AuthorizationCode.to_string(), "authorization_code");
    }
}
