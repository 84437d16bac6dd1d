//! Transfer state machine
//!
//! This module provides the `TransferCoordinator`, the only component that
//! changes a transfer's status. It combines the [`TransferStore`] with an
//! [`AccountService`] backend:
//!
//! ```text
//! PENDING ──execute──► COMPLETED
//!    │
//!    └─────cancel────► CANCELLED
//! ```
//!
//! Any transition requested from a non-`PENDING` transfer answers
//! [`TransferStatus::Error`] and leaves the transfer unchanged. `ERROR` is
//! never stored.
//!
//! # Execution
//!
//! Execution runs the ledger's two-phase protocol with the transfer id as the
//! transaction id: `authorize_payment`, then `finalize_payment`. A declined
//! authorization leaves the transfer `PENDING`. If finalization fails after a
//! successful authorization, the reservation is rolled back with
//! `cancel_payment` so no funds stay held.
//!
//! # Concurrency
//!
//! Each transition runs inside [`TransferStore::with_transfer_mut`], which
//! holds the transfer's entry lock across the status check, the ledger calls
//! and the status write. Concurrent execute/cancel calls on one id are
//! therefore serialized and at most one of them leaves `PENDING`.

use crate::core::ledger::Ledger;
use crate::core::traits::AccountService;
use crate::core::transfer_store::TransferStore;
use crate::types::{FilterParams, PaymentStatus, Transfer, TransferData, TransferError, TransferStatus};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Drives transfers through their lifecycle
///
/// Generic over the ledger backend so tests can substitute a scripted one.
pub struct TransferCoordinator<L: AccountService = Ledger> {
    store: Arc<TransferStore>,
    ledger: Arc<L>,
}

impl<L: AccountService> TransferCoordinator<L> {
    /// Create a coordinator over shared store and ledger instances
    ///
    /// # Arguments
    ///
    /// * `store` - Transfer store, shared with read-only consumers
    /// * `ledger` - Fund-movement backend
    pub fn new(store: Arc<TransferStore>, ledger: Arc<L>) -> Self {
        Self { store, ledger }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<TransferStore> {
        &self.store
    }

    /// The underlying ledger
    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    /// Validate and store a new `PENDING` transfer
    ///
    /// No funds are reserved at creation time.
    ///
    /// # Errors
    ///
    /// Returns `TransferError::Validation` if `data` fails
    /// [`TransferData::validate`]; nothing is stored in that case.
    pub fn create_transfer(&self, data: TransferData) -> Result<Transfer, TransferError> {
        data.validate()?;
        let transfer = self.store.add(data);
        info!(
            transfer_id = %transfer.id,
            source = %transfer.source,
            destination = %transfer.destination,
            amount = %transfer.amount,
            currency = %transfer.currency,
            "Transfer created"
        );
        Ok(transfer)
    }

    /// Look up one transfer
    pub fn get_transfer_details(&self, id: &str) -> Option<Transfer> {
        self.store.get(id)
    }

    /// List transfers matching `params`
    pub fn get_transfers(&self, params: &FilterParams) -> Vec<Transfer> {
        self.store.list(params)
    }

    /// Amend the data fields of a pending transfer
    ///
    /// # Errors
    ///
    /// * `TransferError::Validation` - `data` is invalid
    /// * `TransferError::NotFound` - no transfer has this id
    /// * `TransferError::Conflict` - the transfer is no longer `PENDING`
    pub fn update_transfer(&self, id: &str, data: TransferData) -> Result<Transfer, TransferError> {
        data.validate()?;
        self.store
            .with_transfer_mut(id, |transfer| {
                if !transfer.status.is_pending() {
                    return Err(TransferError::conflict(id, transfer.status, "update"));
                }
                transfer.apply(data);
                debug!(transfer_id = id, "Transfer updated");
                Ok(transfer.clone())
            })
            .ok_or_else(|| TransferError::not_found(id))?
    }

    /// Execute a pending transfer
    ///
    /// # Returns
    ///
    /// * `TransferStatus::Completed` - funds moved, transfer is now `COMPLETED`
    /// * `TransferStatus::Error` - the transfer was not `PENDING` or the
    ///   ledger refused; the stored status is unchanged
    ///
    /// # Errors
    ///
    /// Returns `TransferError::NotFound` if no transfer has this id.
    pub fn execute_transfer(&self, id: &str) -> Result<TransferStatus, TransferError> {
        self.store
            .with_transfer_mut(id, |transfer| {
                if !transfer.status.is_pending() {
                    warn!(transfer_id = id, status = %transfer.status, "Execution refused");
                    return TransferStatus::Error;
                }

                if !self.settle(transfer) {
                    return TransferStatus::Error;
                }

                transfer.status = TransferStatus::Completed;
                info!(transfer_id = id, "Transfer executed");
                TransferStatus::Completed
            })
            .ok_or_else(|| TransferError::not_found(id))
    }

    /// Cancel a pending transfer
    ///
    /// A pending transfer holds no reservation, so no ledger call is made.
    ///
    /// # Returns
    ///
    /// * `TransferStatus::Cancelled` - transfer is now `CANCELLED`
    /// * `TransferStatus::Error` - the transfer was not `PENDING`; unchanged
    ///
    /// # Errors
    ///
    /// Returns `TransferError::NotFound` if no transfer has this id.
    pub fn cancel_transfer(&self, id: &str) -> Result<TransferStatus, TransferError> {
        self.store
            .with_transfer_mut(id, |transfer| {
                if !transfer.status.is_pending() {
                    warn!(transfer_id = id, status = %transfer.status, "Cancellation refused");
                    return TransferStatus::Error;
                }
                transfer.status = TransferStatus::Cancelled;
                info!(transfer_id = id, "Transfer cancelled");
                TransferStatus::Cancelled
            })
            .ok_or_else(|| TransferError::not_found(id))
    }

    /// Remove every transfer, bypassing the state machine
    ///
    /// Ledger balances and reservations are not touched.
    pub fn cleanup(&self) {
        let removed = self.store.len();
        self.store.clear();
        info!(removed, "All transfers deleted");
    }

    /// Authorize then finalize `transfer` on the ledger
    ///
    /// Returns `true` only if funds reached the destination.
    fn settle(&self, transfer: &Transfer) -> bool {
        let tx_id = transfer.id.as_str();

        let authorized = self.ledger.authorize_payment(
            &transfer.source,
            &transfer.destination,
            transfer.amount,
            &transfer.currency,
            tx_id,
        );
        if authorized != PaymentStatus::Authorized {
            warn!(transfer_id = tx_id, status = %authorized, "Authorization failed");
            return false;
        }

        let finalized = self.ledger.finalize_payment(tx_id);
        if finalized == PaymentStatus::Completed {
            return true;
        }

        let rollback = self.ledger.cancel_payment(tx_id);
        warn!(
            transfer_id = tx_id,
            status = %finalized,
            rollback = %rollback,
            "Finalization failed, reservation rolled back"
        );
        false
    }
}
