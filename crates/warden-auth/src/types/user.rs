//! Resource-owner account records.

use serde::{Deserialize, Serialize};
use warden_kv::HashRecord;

use crate::entity::{Entity, EntityKind, SecondaryKeyed};
use crate::types::require_field;
use crate::AuthResult;

/// One resource-owner account.
///
/// Users are keyed internally by `id`; the `username` is registered as a
/// secondary lookup key on save (`user:{username}` → id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Internal identifier, the storage key.
    pub id: String,

    /// Login name.
    pub username: String,

    /// Password. Stored as provisioned; hashing policy belongs to the
    /// caller.
    pub password: String,

    /// Display name.
    pub name: String,
}

impl UserRecord {
    /// Creates a user record.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            password: password.into(),
            name: name.into(),
        }
    }
}

impl Entity for UserRecord {
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_record(&self) -> HashRecord {
        HashRecord::new(self.id.as_str())
            .with_field("username", self.username.as_str())
            .with_field("password", self.password.as_str())
            .with_field("name", self.name.as_str())
    }

    fn from_record(record: &HashRecord) -> AuthResult<Self> {
        Ok(Self {
            id: require_field(record, "id")?,
            username: require_field(record, "username")?,
            password: require_field(record, "password")?,
            name: require_field(record, "name")?,
        })
    }

    fn secondary_entry(&self) -> Option<(String, String)> {
        Some((Self::secondary_key(&self.username), self.id.clone()))
    }
}

impl SecondaryKeyed for UserRecord {
    fn secondary_key(value: &str) -> String {
        format!("user:{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_roundtrip() {
        let user = UserRecord::new("user:1", "bob", "secret", "Bob Smith");
        let decoded = UserRecord::from_record(&user.to_record()).unwrap();
        assert_eq!(decoded, user);
    }

    #[test]
    fn test_secondary_entry() {
        let user = UserRecord::new("user:1", "bob", "secret", "Bob Smith");
        assert_eq!(
            user.secondary_entry(),
            Some(("user:bob".to_string(), "user:1".to_string()))
        );
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let record = HashRecord::new("user:1").with_field("username", "bob");
        assert!(UserRecord::from_record(&record).is_err());
    }
}
