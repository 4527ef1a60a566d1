//! # warden-auth
//!
//! Credential and principal persistence for an OAuth 2.0 authorization
//! server, on top of the [`warden_kv`] key-value contract.
//!
//! This crate provides:
//! - Typed records for access tokens, refresh tokens, and authorization codes
//! - Client and user principal records with human-facing key lookup
//! - One generic repository serving every entity kind
//! - Ephemeral interactive-authorization transactions with a time-to-live
//! - Expired-token sweeping, on demand or as a background task
//!
//! ## Overview
//!
//! Credentials circulate as opaque compact JWS strings, but only their
//! `jti` identifier is ever persisted; the store maps identifiers to flat
//! hash records and never sees a full token. The [`AuthStore`] context
//! bundles a backend handle with configuration and is threaded through the
//! application explicitly, so independent stores (say, one per test) never
//! share state.
//!
//! ```ignore
//! use std::sync::Arc;
//! use warden_auth::prelude::*;
//! use warden_kv_memory::MemoryKv;
//!
//! let store = AuthStore::new(Arc::new(MemoryKv::new()));
//! let token = AccessTokenRecord::from_credential(&jws, "user:1", "client:1", expires_at)?;
//! store.access_tokens().save(&token).await?;
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Store and transaction configuration
//! - [`credential`] - Identifier extraction from opaque credentials
//! - [`entity`] - The entity contract and kind-capability markers
//! - [`error`] - Error types and OAuth error-code mapping
//! - [`repository`] - The generic per-kind repository
//! - [`store`] - The [`AuthStore`] context and background maintenance
//! - [`transaction`] - Pending interactive-authorization state
//! - [`types`] - The concrete record types

pub mod config;
pub mod credential;
pub mod entity;
pub mod error;
pub mod repository;
pub mod store;
pub mod transaction;
pub mod types;

pub use config::{StoreConfig, TransactionConfig};
pub use credential::extract_credential_id;
pub use entity::{CredentialEntity, Entity, EntityKind, ExpiringEntity, SecondaryKeyed};
pub use error::{AuthError, ErrorCategory};
pub use repository::Repository;
pub use store::AuthStore;
pub use transaction::{ClientSerializer, Transaction, TransactionStore};
pub use types::{
    AccessTokenRecord, AuthorizationCodeRecord, ClientRecord, DEFAULT_SCOPE, RefreshTokenRecord,
    UserRecord,
};

/// Type alias for credential-store results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use warden_auth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::AuthResult;
    pub use crate::config::{StoreConfig, TransactionConfig};
    pub use crate::credential::extract_credential_id;
    pub use crate::entity::{CredentialEntity, Entity, EntityKind, ExpiringEntity, SecondaryKeyed};
    pub use crate::error::{AuthError, ErrorCategory};
    pub use crate::repository::Repository;
    pub use crate::store::AuthStore;
    pub use crate::transaction::{ClientSerializer, Transaction, TransactionStore};
    pub use crate::types::{
        AccessTokenRecord, AuthorizationCodeRecord, ClientRecord, DEFAULT_SCOPE,
        RefreshTokenRecord, UserRecord,
    };
}
