//! Error types for the transfer service
//!
//! This module defines the errors the core can report to its callers.
//! Illegal state transitions and ledger declines are NOT errors: they are
//! reported as [`TransferStatus::Error`](super::TransferStatus) outcomes.
//!
//! # Error Categories
//!
//! - **Validation**: malformed or out-of-range input (bad currency, bad number, bad sort field)
//! - **Not found**: unknown transfer id
//! - **Conflict**: an amendment attempted on a transfer that is no longer pending
//! - **Internal**: unexpected failures, never shown verbatim to API clients

use super::transfer::TransferStatus;
use thiserror::Error;

/// Main error type for the transfer service
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransferError {
    /// Input failed validation
    ///
    /// The message is safe to return to the caller as-is.
    #[error("{message}")]
    Validation {
        /// Human-readable description of the rejected value
        message: String,
    },

    /// No transfer with the given id exists
    #[error("Transfer {id} not found")]
    NotFound {
        /// The id that was looked up
        id: String,
    },

    /// The transfer is not in a state that allows the operation
    #[error("Transfer {id} is {status}, {operation} requires PENDING")]
    Conflict {
        /// Transfer id
        id: String,
        /// Current stored status
        status: TransferStatus,
        /// Operation that was refused
        operation: String,
    },

    /// Unexpected failure
    ///
    /// Logged in full, reported to API clients with a generic message.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the failure
        message: String,
    },
}

// Helper functions for creating common errors

impl TransferError {
    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        TransferError::Validation {
            message: message.into(),
        }
    }

    /// Create a NotFound error
    pub fn not_found(id: &str) -> Self {
        TransferError::NotFound { id: id.to_string() }
    }

    /// Create a Conflict error
    pub fn conflict(id: &str, status: TransferStatus, operation: &str) -> Self {
        TransferError::Conflict {
            id: id.to_string(),
            status,
            operation: operation.to_string(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        TransferError::Internal {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for TransferError {
    fn from(error: serde_json::Error) -> Self {
        TransferError::internal(format!("serialization failed: {}", error))
    }
}
