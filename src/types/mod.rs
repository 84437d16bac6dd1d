//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `transfer`: the Transfer record, its status and input data
//! - `currency`: accepted ISO 4217 codes
//! - `payment`: ledger outcome codes
//! - `filter`: typed list/sort parameters
//! - `error`: error types for the transfer service

pub mod currency;
pub mod error;
pub mod filter;
pub mod payment;
pub mod transfer;

pub use currency::{Currency, ACCEPTED_CURRENCIES};
pub use error::TransferError;
pub use filter::{FilterParams, SortField, SortOrder, DEFAULT_QUERY_LIMIT};
pub use payment::PaymentStatus;
pub use transfer::{AccountId, Transfer, TransferData, TransferId, TransferStatus};
