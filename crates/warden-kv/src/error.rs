//! Error types for the key-value storage contract.
//!
//! This module defines all error types that can occur during backend operations.

/// Errors that can occur during key-value operations.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    /// Failed to reach the storage backend.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },

    /// The backend rejected or failed a command.
    #[error("Backend error: {message}")]
    Backend {
        /// Description of the backend failure.
        message: String,
    },

    /// A value could not be encoded for, or decoded from, the backend.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization failure.
        message: String,
    },

    /// A hash record was submitted without an `id` field.
    ///
    /// The record's `id` is its storage key; writing a record without one
    /// would strand the data under no retrievable key.
    #[error("Hash record is missing its id field")]
    MissingId,
}

impl KvError {
    /// Creates a new `Connection` error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a new `Backend` error.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Creates a new `Serialization` error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Returns `true` if this error indicates the backend was unreachable.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Returns `true` if this is a missing-id rejection.
    #[must_use]
    pub fn is_missing_id(&self) -> bool {
        matches!(self, Self::MissingId)
    }
}
