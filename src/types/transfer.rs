//! Transfer-related types for the transfer service
//!
//! This module defines the Transfer record, its lifecycle status and the
//! caller-supplied data a transfer is created or amended from.
//!
//! # JSON Form
//!
//! `amount` is written as a JSON string (`"340.23"`) so the exact decimal
//! survives the wire; clients that expect a JSON number must parse it.
//! Request bodies accept either form.

use super::currency::Currency;
use super::error::TransferError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transfer identifier
///
/// Opaque string, a UUID v4 assigned by the store at creation time.
/// Also used as the ledger transaction id for the transfer.
pub type TransferId = String;

/// Account identifier (IBAN-like free text)
pub type AccountId = String;

/// Lifecycle status of a transfer
///
/// Only `Pending`, `Completed` and `Cancelled` are ever stored on a transfer.
/// `Error` is a response code returned when a transition is not allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransferStatus {
    /// Initial state; the only state from which a transition is legal
    Pending,

    /// Funds were moved from source to destination
    Completed,

    /// Transfer was withdrawn before execution
    Cancelled,

    /// Transition rejected; the stored transfer was left unchanged
    Error,
}

impl TransferStatus {
    /// Get the wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Pending => "PENDING",
            TransferStatus::Completed => "COMPLETED",
            TransferStatus::Cancelled => "CANCELLED",
            TransferStatus::Error => "ERROR",
        }
    }

    /// Whether execute/cancel may still be applied to a transfer in this state
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, TransferStatus::Pending)
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransferStatus {
    type Err = TransferError;

    /// Case-insensitive match against the status names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(TransferStatus::Pending),
            "COMPLETED" => Ok(TransferStatus::Completed),
            "CANCELLED" => Ok(TransferStatus::Cancelled),
            "ERROR" => Ok(TransferStatus::Error),
            _ => Err(TransferError::validation(format!(
                "Unknown transfer status '{}'",
                s
            ))),
        }
    }
}

/// Caller-supplied transfer fields
///
/// Used both to create a transfer and to amend a pending one. The amount is
/// expected to be non-negative; [`TransferData::validate`] checks it.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferData {
    /// Account the funds are taken from
    pub source: AccountId,

    /// Account the funds are credited to
    pub destination: AccountId,

    /// Exact decimal amount (non-negative)
    pub amount: Decimal,

    /// ISO 4217 currency code from the accepted list
    pub currency: Currency,

    /// Free text shown to both parties
    pub title: String,
}

impl TransferData {
    /// Check the invariants the type system does not carry
    ///
    /// # Errors
    ///
    /// Returns a validation error if the amount is negative or an account
    /// id is blank.
    pub fn validate(&self) -> Result<(), TransferError> {
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            return Err(TransferError::validation(format!(
                "Amount must not be negative: {}",
                self.amount
            )));
        }
        if self.source.trim().is_empty() {
            return Err(TransferError::validation("Source account is required"));
        }
        if self.destination.trim().is_empty() {
            return Err(TransferError::validation("Destination account is required"));
        }
        Ok(())
    }
}

/// A money transfer request
///
/// Identity is `id`. `timestamp` and `id` never change after creation;
/// `status` is changed only by the coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: TransferId,

    /// Creation instant
    pub timestamp: DateTime<Utc>,

    pub status: TransferStatus,

    pub source: AccountId,

    pub destination: AccountId,

    /// Serialized as a string to keep the exact decimal representation
    pub amount: Decimal,

    pub currency: Currency,

    pub title: String,

    /// Store insertion order, breaks ties between equal sort keys
    #[serde(skip)]
    pub(crate) sequence: u64,
}

impl Transfer {
    /// Copy the data fields onto this transfer, leaving identity and status alone
    pub(crate) fn apply(&mut self, data: TransferData) {
        self.source = data.source;
        self.destination = data.destination;
        self.amount = data.amount;
        self.currency = data.currency;
        self.title = data.title;
    }
}
