//! Concurrent transfer storage
//!
//! This module provides the `TransferStore`, a keyed in-memory map of
//! transfers. It assigns identity (a random UUID), the creation timestamp and
//! the initial `PENDING` status, and hands out exclusive access to a single
//! transfer for the coordinator's state transitions.
//!
//! # Thread Safety
//!
//! Transfers live in a `DashMap`. [`TransferStore::with_transfer_mut`] holds
//! the transfer's entry lock for the whole closure, so two callers can never
//! observe or change the same transfer at the same time. Operations on
//! different transfers proceed in parallel unless they share a shard.

use crate::core::query::QueryEngine;
use crate::types::{FilterParams, Transfer, TransferData, TransferId, TransferStatus};
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;
use uuid::Uuid;

/// In-memory transfer store
///
/// Shared between request handlers behind an `Arc`; all methods take `&self`.
#[derive(Debug, Default)]
pub struct TransferStore {
    /// Map of transfer id to transfer
    transfers: DashMap<TransferId, Transfer>,

    /// Next insertion sequence number
    sequence: AtomicU64,
}

impl TransferStore {
    /// Create a new empty transfer store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new transfer built from `data`
    ///
    /// The transfer gets a fresh UUID, the current time and status `PENDING`.
    ///
    /// # Arguments
    ///
    /// * `data` - Caller-supplied transfer fields
    ///
    /// # Returns
    ///
    /// A copy of the stored transfer
    pub fn add(&self, data: TransferData) -> Transfer {
        let transfer = Transfer {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            status: TransferStatus::Pending,
            source: data.source,
            destination: data.destination,
            amount: data.amount,
            currency: data.currency,
            title: data.title,
            sequence: self.sequence.fetch_add(1, Ordering::Relaxed),
        };
        debug!(transfer_id = %transfer.id, "Transfer stored");
        self.transfers.insert(transfer.id.clone(), transfer.clone());
        transfer
    }

    /// Overwrite the data fields of an existing transfer
    ///
    /// Identity, timestamp and status are kept.
    ///
    /// # Returns
    ///
    /// * `Some(Transfer)` - The updated transfer
    /// * `None` - If no transfer has this id
    pub fn update(&self, id: &str, data: TransferData) -> Option<Transfer> {
        self.with_transfer_mut(id, |transfer| {
            transfer.apply(data);
            transfer.clone()
        })
    }

    /// Run `f` with exclusive access to one transfer
    ///
    /// The entry stays locked until `f` returns; any other access to the same
    /// transfer waits. `f` must not call back into this store for the same id.
    ///
    /// # Returns
    ///
    /// * `Some(R)` - The closure's result
    /// * `None` - If no transfer has this id
    pub(crate) fn with_transfer_mut<F, R>(&self, id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut Transfer) -> R,
    {
        let mut entry = self.transfers.get_mut(id)?;
        Some(f(entry.value_mut()))
    }

    /// Get a copy of one transfer
    pub fn get(&self, id: &str) -> Option<Transfer> {
        self.transfers.get(id).map(|entry| entry.value().clone())
    }

    /// Remove one transfer
    ///
    /// # Returns
    ///
    /// `true` if a transfer was removed
    pub fn delete(&self, id: &str) -> bool {
        self.transfers.remove(id).is_some()
    }

    /// List transfers matching `params`, sorted and limited
    pub fn list(&self, params: &FilterParams) -> Vec<Transfer> {
        let snapshot = self.transfers.iter().map(|entry| entry.value().clone());
        QueryEngine::new(params).run(snapshot)
    }

    /// Remove every transfer
    pub fn clear(&self) {
        self.transfers.clear();
    }

    pub fn len(&self) -> usize {
        self.transfers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }
}
