//! In-memory key-value backend for the Warden credential store.
//!
//! This crate provides an in-process implementation of the `KeyValueStore`
//! trait from `warden-kv`, using a DashMap for concurrent access. Expiries
//! are enforced lazily: an expired key is purged the next time any operation
//! touches it.
//!
//! Intended for tests and single-node development; the production backend is
//! `warden-kv-redis`.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use warden_kv::{DynKv, KeyValueStore};
//! use warden_kv_memory::MemoryKv;
//!
//! let kv: DynKv = Arc::new(MemoryKv::new());
//! kv.set("client:abc123", "client:1").await?;
//! ```

mod storage;

// Re-export the contract for convenience
pub use warden_kv::{DynKv, HashRecord, KeyValueStore, KvError, KvResult};

pub use storage::MemoryKv;
