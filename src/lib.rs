//! Rust Transfer Service Library
//! # Overview
//!
//! This library provides an in-memory money transfer service: transfers are
//! created as `PENDING`, then executed against a two-phase ledger or cancelled.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Transfer, Currency, FilterParams, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`logging`] - Tracing subscriber setup
//! - [`core`] - Business logic components:
//!   - [`core::ledger`] - Account balances with authorize/finalize/cancel
//!   - [`core::transfer_store`] - Concurrent transfer storage
//!   - [`core::query`] - Filtering, sorting and limiting of listings
//!   - [`core::coordinator`] - The transfer state machine
//! - [`api`] - axum router, handlers and response envelope
//!
//! # Transfer Lifecycle
//!
//! - **PENDING**: created, no funds reserved
//! - **COMPLETED**: executed, funds moved from source to destination
//! - **CANCELLED**: cancelled before execution
//!
//! Execute and cancel only apply to `PENDING` transfers. Any other request
//! answers `ERROR` and leaves the transfer unchanged.
//!
//! # Ledger Protocol
//!
//! Execution authorizes the amount on the source (debit into a reservation),
//! then finalizes it (credit to the destination). A reservation that cannot be
//! finalized is cancelled, returning the funds to the source.

// Module declarations
pub mod api;
pub mod cli;
pub mod core;
pub mod logging;
pub mod types;

pub use core::{AccountService, Ledger, QueryEngine, TransferCoordinator, TransferStore};
pub use types::{
    Currency, FilterParams, PaymentStatus, SortField, SortOrder, Transfer, TransferData,
    TransferError, TransferId, TransferStatus,
};
