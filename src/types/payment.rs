//! Ledger outcome codes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of a ledger operation
///
/// Declines and invalid accounts are business outcomes, not errors: the
/// ledger never fails a call, it reports what happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Funds reserved on the source account
    Authorized,

    /// Not enough funds, or the credited account does not exist
    Declined,

    /// The source account does not exist
    InvalidAccount,

    /// Reservation rolled back to the source account
    Cancelled,

    /// Funds credited to the destination account
    Completed,

    /// Operation not valid for the transaction's current state
    Error,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Authorized => "AUTHORIZED",
            PaymentStatus::Declined => "DECLINED",
            PaymentStatus::InvalidAccount => "INVALID_ACCOUNT",
            PaymentStatus::Cancelled => "CANCELLED",
            PaymentStatus::Completed => "COMPLETED",
            PaymentStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
