//! Core traits for ledger operations
//!
//! The coordinator talks to the ledger only through [`AccountService`], so a
//! different fund-movement backend (or a test double) can be plugged in
//! without touching the transfer state machine.

use crate::types::{Currency, PaymentStatus};
use rust_decimal::Decimal;

/// Two-phase fund movement used to settle transfers
///
/// `authorize_payment` reserves funds, then exactly one of
/// `finalize_payment` (commit) or `cancel_payment` (rollback) resolves the
/// reservation. All methods must be safe to call concurrently.
pub trait AccountService: Send + Sync {
    /// Reserve `amount` on `source` for later delivery to `destination`
    fn authorize_payment(
        &self,
        source: &str,
        destination: &str,
        amount: Decimal,
        currency: &Currency,
        tx_id: &str,
    ) -> PaymentStatus;

    /// Return the reserved funds of an authorized transaction to its source
    fn cancel_payment(&self, tx_id: &str) -> PaymentStatus;

    /// Credit the reserved funds of an authorized transaction to its destination
    fn finalize_payment(&self, tx_id: &str) -> PaymentStatus;

    /// Credit `amount` directly to an existing account
    fn deposit(
        &self,
        account: &str,
        amount: Decimal,
        currency: &Currency,
        tx_id: &str,
    ) -> PaymentStatus;
}
