//! # warden-kv
//!
//! Key-value storage contract for the Warden credential store.
//!
//! This crate defines the trait and types that all storage backends must implement.
//! It does not contain any implementations - those are provided by separate crates
//! (`warden-kv-memory`, `warden-kv-redis`).
//!
//! ## Overview
//!
//! The main trait is [`KeyValueStore`], which defines the backend primitives the
//! credential repositories and the transaction store are built on:
//! - Scalar operations (get, set, delete, set with expiry)
//! - Hash records keyed by their `id` field
//! - Membership sets of live ids
//!
//! ## Example
//!
//! ```ignore
//! use warden_kv::{DynKv, HashRecord, KvResult};
//!
//! async fn store_record(kv: &DynKv) -> KvResult<Option<HashRecord>> {
//!     let record = HashRecord::new("tok-1")
//!         .with_field("userID", "user:1")
//!         .with_field("clientID", "client:1");
//!
//!     kv.set_add("tokens", "tok-1").await?;
//!     kv.hash_set_fields(&record).await?;
//!     kv.hash_get_all("tok-1").await
//! }
//! ```
//!
//! ## Storage Backends
//!
//! To implement a storage backend, implement the [`KeyValueStore`] trait:
//!
//! ```ignore
//! use async_trait::async_trait;
//! use warden_kv::{HashRecord, KeyValueStore, KvResult};
//!
//! struct MyBackend {
//!     // ...
//! }
//!
//! #[async_trait]
//! impl KeyValueStore for MyBackend {
//!     async fn get(&self, key: &str) -> KvResult<Option<String>> {
//!         // Implementation
//!     }
//!     // ... other methods
//! }
//! ```

mod error;
mod record;
mod traits;

// Re-export everything from submodules
pub use error::KvError;
pub use record::{HashRecord, ID_FIELD};
pub use traits::KeyValueStore;

/// Type alias for a key-value operation result.
pub type KvResult<T> = Result<T, KvError>;

/// Type alias for a shared key-value store trait object.
pub type DynKv = std::sync::Arc<dyn KeyValueStore>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use warden_kv::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::KvError;
    pub use crate::record::HashRecord;
    pub use crate::traits::KeyValueStore;
    pub use crate::{DynKv, KvResult};
}
