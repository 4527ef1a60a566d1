//! Credential-store error types.
//!
//! This module defines all error types that can occur while persisting or
//! resolving credentials, principals, and authorization transactions.

use std::fmt;

use warden_kv::KvError;

/// Errors that can occur during credential-store operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The bearer credential could not be decoded into an identifier.
    #[error("Malformed credential: {message}")]
    MalformedCredential {
        /// Description of why the credential could not be decoded.
        message: String,
    },

    /// A required request parameter was absent.
    #[error("Missing required parameter: {name}")]
    MissingParameter {
        /// Name of the absent parameter.
        name: String,
    },

    /// No transaction record exists for the presented identifier.
    #[error("Transaction not found: {transaction_id}")]
    TransactionNotFound {
        /// The identifier that resolved to nothing.
        transaction_id: String,
    },

    /// The transaction's client handle no longer resolves to a known client.
    ///
    /// Signaled after the stale transaction record has been deleted.
    #[error("Unauthorized client")]
    UnauthorizedClient,

    /// A record or callback value could not be encoded or decoded.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization failure.
        message: String,
    },

    /// The storage backend failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage failure.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `MalformedCredential` error.
    #[must_use]
    pub fn malformed_credential(message: impl Into<String>) -> Self {
        Self::MalformedCredential {
            message: message.into(),
        }
    }

    /// Creates a new `MissingParameter` error.
    #[must_use]
    pub fn missing_parameter(name: impl Into<String>) -> Self {
        Self::MissingParameter { name: name.into() }
    }

    /// Creates a new `TransactionNotFound` error.
    #[must_use]
    pub fn transaction_not_found(transaction_id: impl Into<String>) -> Self {
        Self::TransactionNotFound {
            transaction_id: transaction_id.into(),
        }
    }

    /// Creates a new `Serialization` error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Returns `true` if this error means "the thing does not exist".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TransactionNotFound { .. })
    }

    /// Returns `true` if this error was caused by the caller's input.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedCredential { .. }
                | Self::MissingParameter { .. }
                | Self::TransactionNotFound { .. }
                | Self::UnauthorizedClient
        )
    }

    /// Returns `true` if this error originated inside the store or backend.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Serialization { .. } | Self::Storage { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedCredential { .. } => ErrorCategory::Credential,
            Self::MissingParameter { .. } => ErrorCategory::Validation,
            Self::TransactionNotFound { .. } => ErrorCategory::Transaction,
            Self::UnauthorizedClient => ErrorCategory::Transaction,
            Self::Serialization { .. } => ErrorCategory::Serialization,
            Self::Storage { .. } => ErrorCategory::Infrastructure,
        }
    }

    /// Returns the OAuth 2.0 error code for this error.
    ///
    /// The flow orchestrator picks its protocol-level response from this
    /// instead of matching on variants: missing parameters are a bad
    /// request, an unknown transaction is forbidden, a dead client handle
    /// is `unauthorized_client`.
    #[must_use]
    pub fn oauth_error_code(&self) -> &'static str {
        match self {
            Self::MalformedCredential { .. } => "invalid_token",
            Self::MissingParameter { .. } => "invalid_request",
            Self::TransactionNotFound { .. } => "access_denied",
            Self::UnauthorizedClient => "unauthorized_client",
            Self::Serialization { .. } => "server_error",
            Self::Storage { .. } => "server_error",
        }
    }
}

impl From<KvError> for AuthError {
    fn from(err: KvError) -> Self {
        match err {
            KvError::Serialization { message } => Self::Serialization { message },
            other => Self::Storage {
                message: other.to_string(),
            },
        }
    }
}

/// Categories of credential-store errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Credential decoding errors.
    Credential,
    /// Request validation errors.
    Validation,
    /// Transaction lifecycle errors.
    Transaction,
    /// Encode/decode errors.
    Serialization,
    /// Infrastructure/backend errors.
    Infrastructure,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Credential => write!(f, "credential"),
            Self::Validation => write!(f, "validation"),
            Self::Transaction => write!(f, "transaction"),
            Self::Serialization => write!(f, "serialization"),
            Self::Infrastructure => write!(f, "infrastructure"),
        }
    }
}
