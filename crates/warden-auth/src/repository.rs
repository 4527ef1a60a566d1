//! Generic entity repository over the key-value contract.
//!
//! One repository type serves every entity kind; the kind's [`Entity`] impl
//! supplies the membership set and the wire form, and the marker traits
//! unlock the kind-specific capabilities (lookup by raw credential, expiry
//! sweeping, secondary-key lookup).
//!
//! # Implementation Notes
//!
//! Multi-step writes are sequential, not atomic. `save` adds the id to the
//! membership set before writing the hash, `delete` removes it before
//! deleting the hash; a crash between the steps leaves an index entry with
//! no record, which every read path treats as absent. Reads distinguish a
//! true miss (`Ok(None)`) from malformed input and backend failure
//! (`Err`); callers that want the blurred legacy behavior can flatten the
//! result themselves.

use std::marker::PhantomData;

use warden_kv::DynKv;

use crate::credential::extract_credential_id;
use crate::entity::{CredentialEntity, Entity, ExpiringEntity, SecondaryKeyed};
use crate::types::now_unix_ms;
use crate::AuthResult;

/// Repository for one entity kind, parameterized by its record type.
pub struct Repository<E> {
    kv: DynKv,
    _kind: PhantomData<E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            kv: self.kv.clone(),
            _kind: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    /// Creates a repository over the given backend.
    #[must_use]
    pub fn new(kv: DynKv) -> Self {
        Self {
            kv,
            _kind: PhantomData,
        }
    }

    /// Looks up a record by its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error for backend failures or an undecodable stored
    /// record; a plain miss is `Ok(None)`.
    pub async fn find_by_id(&self, id: &str) -> AuthResult<Option<E>> {
        match self.kv.hash_get_all(id).await? {
            None => Ok(None),
            Some(record) => E::from_record(&record).map(Some),
        }
    }

    /// Persists a record and returns the stored copy.
    ///
    /// Write order: membership-set add, hash write, secondary-key
    /// registration (for kinds that have one), then a confirming re-read.
    /// The returned record is what the backend holds after the write.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails; earlier steps are not rolled
    /// back.
    pub async fn save(&self, entity: &E) -> AuthResult<Option<E>> {
        let id = entity.id();
        self.kv.set_add(E::KIND.membership_set(), id).await?;
        self.kv.hash_set_fields(&entity.to_record()).await?;
        if let Some((key, value)) = entity.secondary_entry() {
            self.kv.set(&key, &value).await?;
        }
        // Read-after-write confirmation.
        self.find_by_id(id).await
    }

    /// Deletes a record by its identifier, returning what was stored.
    ///
    /// Index removal precedes hash deletion, so a failure mid-way leaves
    /// an unindexed record rather than a dangling index entry.
    ///
    /// # Errors
    ///
    /// Returns an error for backend failures.
    pub async fn delete_by_id(&self, id: &str) -> AuthResult<Option<E>> {
        let previous = self.find_by_id(id).await?;
        self.unindex_and_delete(id).await?;
        Ok(previous)
    }

    /// Returns the ids in this kind's membership set, in no particular
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error for backend failures.
    pub async fn ids(&self) -> AuthResult<Vec<String>> {
        Ok(self.kv.set_members(E::KIND.membership_set()).await?)
    }

    /// Removes every member of this kind, returning the ids actually
    /// removed.
    ///
    /// Best-effort bulk cleanup: a failure on one id is logged and skipped,
    /// never propagated.
    ///
    /// # Errors
    ///
    /// Returns an error only if the membership set itself cannot be read.
    pub async fn remove_all(&self) -> AuthResult<Vec<String>> {
        let members = self.ids().await?;
        let mut removed = Vec::with_capacity(members.len());
        for id in members {
            match self.unindex_and_delete(&id).await {
                Ok(()) => removed.push(id),
                Err(error) => {
                    tracing::warn!(kind = %E::KIND, id = %id, error = %error, "skipping member during bulk removal");
                }
            }
        }
        Ok(removed)
    }

    async fn unindex_and_delete(&self, id: &str) -> AuthResult<()> {
        self.kv.set_remove(E::KIND.membership_set(), id).await?;
        self.kv.delete(id).await?;
        Ok(())
    }
}

impl<E: CredentialEntity> Repository<E> {
    /// Looks up the record belonging to an opaque bearer credential.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MalformedCredential`] if no identifier can be
    /// extracted; otherwise as [`find_by_id`].
    ///
    /// [`AuthError::MalformedCredential`]: crate::AuthError::MalformedCredential
    /// [`find_by_id`]: Repository::find_by_id
    pub async fn find(&self, credential: &str) -> AuthResult<Option<E>> {
        let id = extract_credential_id(credential)?;
        self.find_by_id(&id).await
    }

    /// Deletes the record belonging to an opaque bearer credential,
    /// returning what was stored.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MalformedCredential`] if no identifier can be
    /// extracted; otherwise as [`delete_by_id`].
    ///
    /// [`AuthError::MalformedCredential`]: crate::AuthError::MalformedCredential
    /// [`delete_by_id`]: Repository::delete_by_id
    pub async fn delete(&self, credential: &str) -> AuthResult<Option<E>> {
        let id = extract_credential_id(credential)?;
        self.delete_by_id(&id).await
    }
}

impl<E: ExpiringEntity> Repository<E> {
    /// Removes every record whose expiry is strictly in the past,
    /// returning the ids removed.
    ///
    /// The comparison uses one wall-clock reading taken at call time, not a
    /// transactional snapshot; a record renewed concurrently can still be
    /// swept. Per-id failures and unreadable expiry fields are logged and
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns an error only if the membership set itself cannot be read.
    pub async fn remove_expired(&self) -> AuthResult<Vec<String>> {
        let now = now_unix_ms();
        let mut removed = Vec::new();

        for id in self.ids().await? {
            let expires_at = match self.kv.hash_get_field(&id, E::EXPIRY_FIELD).await {
                Ok(Some(raw)) => match raw.parse::<i64>() {
                    Ok(ms) => ms,
                    Err(_) => {
                        tracing::warn!(kind = %E::KIND, id = %id, value = %raw, "unparseable expiry field, leaving record in place");
                        continue;
                    }
                },
                // Dangling index entry; reads already treat it as absent.
                Ok(None) => continue,
                Err(error) => {
                    tracing::warn!(kind = %E::KIND, id = %id, error = %error, "failed to read expiry, leaving record in place");
                    continue;
                }
            };

            if now > expires_at {
                match self.unindex_and_delete(&id).await {
                    Ok(()) => removed.push(id),
                    Err(error) => {
                        tracing::warn!(kind = %E::KIND, id = %id, error = %error, "failed to remove expired record");
                    }
                }
            }
        }

        Ok(removed)
    }
}

impl<E: SecondaryKeyed> Repository<E> {
    /// Looks up a record through its human-facing key (`clientId`,
    /// `username`).
    ///
    /// Two sequential lookups: secondary key to internal id, then the
    /// record hash. A secondary key pointing at a missing record reads as
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns an error for backend failures.
    pub async fn find_by_key(&self, value: &str) -> AuthResult<Option<E>> {
        let key = E::secondary_key(value);
        match self.kv.get(&key).await? {
            None => Ok(None),
            Some(id) => self.find_by_id(&id).await,
        }
    }
}
