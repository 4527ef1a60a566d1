//! Hash record type shared by the contract and its backends.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Name of the distinguished identifier field on every hash record.
pub const ID_FIELD: &str = "id";

/// An ordered string-to-string field map persisted as one backend hash.
///
/// Every record carries an `id` field holding its storage key. Field order is
/// preserved so records round-trip the way they were written, which keeps
/// backend dumps and test fixtures readable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashRecord {
    fields: IndexMap<String, String>,
}

impl HashRecord {
    /// Creates a record containing only the `id` field.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let mut fields = IndexMap::new();
        fields.insert(ID_FIELD.to_string(), id.into());
        Self { fields }
    }

    /// Adds a field, builder style.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Inserts or replaces a field.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Returns the value of a field, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Returns the record's identifier.
    ///
    /// An absent or empty `id` field yields `None`; such a record cannot be
    /// persisted (see [`KeyValueStore::hash_set_fields`]).
    ///
    /// [`KeyValueStore::hash_set_fields`]: crate::KeyValueStore::hash_set_fields
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.get(ID_FIELD).filter(|id| !id.is_empty())
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for HashRecord {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_order() {
        let record = HashRecord::new("tok-1")
            .with_field("userID", "user:1")
            .with_field("clientID", "client:1");

        let names: Vec<&str> = record.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["id", "userID", "clientID"]);
        assert_eq!(record.id(), Some("tok-1"));
        assert_eq!(record.get("userID"), Some("user:1"));
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn test_empty_id_reads_as_absent() {
        let record = HashRecord::new("");
        assert_eq!(record.id(), None);
        assert!(!record.is_empty());

        let record: HashRecord = HashRecord::default();
        assert_eq!(record.id(), None);
        assert!(record.is_empty());
    }

    #[test]
    fn test_from_iter() {
        let pairs = vec![
            ("id".to_string(), "u-1".to_string()),
            ("username".to_string(), "bob".to_string()),
        ];
        let record: HashRecord = pairs.into_iter().collect();
        assert_eq!(record.id(), Some("u-1"));
        assert_eq!(record.get("username"), Some("bob"));
    }

    #[test]
    fn test_insert_replaces() {
        let mut record = HashRecord::new("c-1");
        record.insert("name", "Samplr");
        record.insert("name", "Samplr2");
        assert_eq!(record.get("name"), Some("Samplr2"));
        assert_eq!(record.len(), 2);
    }
}
