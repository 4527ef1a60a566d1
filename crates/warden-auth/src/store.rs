//! The authorization store context.
//!
//! [`AuthStore`] bundles one backend handle and one configuration into a
//! value the application threads through explicitly. Every repository
//! accessor is a cheap constructor over the shared handle; there is no
//! process-wide singleton to initialize or tear down, and two stores over
//! different backends coexist in one process (the usual setup in tests).

use std::time::Duration;

use tokio::task::JoinHandle;
use warden_kv::DynKv;

use crate::config::StoreConfig;
use crate::repository::Repository;
use crate::transaction::{ClientSerializer, TransactionStore};
use crate::types::{
    AccessTokenRecord, AuthorizationCodeRecord, ClientRecord, RefreshTokenRecord, UserRecord,
};
use crate::AuthResult;

/// Handle to the credential store: repositories for every entity kind plus
/// the transaction store, all over one backend.
#[derive(Clone)]
pub struct AuthStore {
    kv: DynKv,
    config: StoreConfig,
}

impl AuthStore {
    /// Creates a store with default configuration.
    #[must_use]
    pub fn new(kv: DynKv) -> Self {
        Self::with_config(kv, StoreConfig::default())
    }

    /// Creates a store with explicit configuration.
    #[must_use]
    pub fn with_config(kv: DynKv, config: StoreConfig) -> Self {
        Self { kv, config }
    }

    /// Returns the underlying backend handle.
    #[must_use]
    pub fn kv(&self) -> &DynKv {
        &self.kv
    }

    /// Returns the store configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // ==================== Repositories ====================

    /// Access-token records.
    #[must_use]
    pub fn access_tokens(&self) -> Repository<AccessTokenRecord> {
        Repository::new(self.kv.clone())
    }

    /// Refresh-token records.
    #[must_use]
    pub fn refresh_tokens(&self) -> Repository<RefreshTokenRecord> {
        Repository::new(self.kv.clone())
    }

    /// Authorization-code records.
    #[must_use]
    pub fn authorization_codes(&self) -> Repository<AuthorizationCodeRecord> {
        Repository::new(self.kv.clone())
    }

    /// Registered OAuth clients.
    #[must_use]
    pub fn clients(&self) -> Repository<ClientRecord> {
        Repository::new(self.kv.clone())
    }

    /// User accounts.
    #[must_use]
    pub fn users(&self) -> Repository<UserRecord> {
        Repository::new(self.kv.clone())
    }

    /// Pending interactive authorizations, resolved through the given
    /// client serializer.
    #[must_use]
    pub fn transactions<S: ClientSerializer>(&self, serializer: S) -> TransactionStore<S> {
        TransactionStore::new(self.kv.clone(), serializer, self.config.transaction.clone())
    }

    // ==================== Maintenance ====================

    /// Seeds well-known clients and users, typically at startup from
    /// static configuration. Saving is an upsert, so provisioning is safe
    /// to repeat on every boot.
    ///
    /// # Errors
    ///
    /// Returns the first save failure; earlier saves are not rolled back.
    pub async fn provision(
        &self,
        clients: &[ClientRecord],
        users: &[UserRecord],
    ) -> AuthResult<()> {
        let client_repo = self.clients();
        for client in clients {
            client_repo.save(client).await?;
        }
        let user_repo = self.users();
        for user in users {
            user_repo.save(user).await?;
        }
        tracing::info!(
            clients = clients.len(),
            users = users.len(),
            "provisioned principals"
        );
        Ok(())
    }

    /// Spawns a background task that sweeps expired access tokens on a
    /// fixed interval. The first sweep runs immediately.
    ///
    /// The task runs until the handle is aborted or the runtime shuts
    /// down; sweep failures are logged and the loop keeps going.
    #[must_use]
    pub fn spawn_expired_token_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                match store.access_tokens().remove_expired().await {
                    Ok(removed) if !removed.is_empty() => {
                        tracing::info!(count = removed.len(), "removed expired access tokens");
                    }
                    Ok(_) => {}
                    Err(error) => {
                        tracing::error!(error = %error, "expired access token sweep failed");
                    }
                }
            }
        })
    }
}
