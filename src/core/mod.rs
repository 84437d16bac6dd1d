//! Core business logic module
//!
//! This module contains the transfer processing components:
//! - `traits` - The two-phase fund-movement abstraction
//! - `ledger` - In-memory account balances and reservations
//! - `transfer_store` - Concurrent transfer storage
//! - `query` - Filter, sort and limit pipeline for listings
//! - `coordinator` - The transfer state machine

pub mod coordinator;
pub mod ledger;
pub mod query;
pub mod traits;
pub mod transfer_store;

pub use coordinator::TransferCoordinator;
pub use ledger::{Ledger, Reservation};
pub use query::QueryEngine;
pub use traits::AccountService;
pub use transfer_store::TransferStore;
