//! Simulated fund-movement ledger
//!
//! This module provides the `Ledger`, an in-memory balance store backing
//! transfer settlement with a two-phase protocol:
//!
//! ```text
//! authorize ──► AUTHORIZED ──► finalize ──► COMPLETED
//!                    │
//!                    └──────► cancel ────► CANCELLED
//! ```
//!
//! - **authorize** debits the source immediately and keeps the amount in a
//!   reservation, so the same balance cannot be spent twice
//! - **finalize** credits the reserved amount to the destination
//! - **cancel** credits the reserved amount back to the source
//!
//! A reservation exists exactly while its transaction is `AUTHORIZED`; it is
//! stored inside the transaction record so the two cannot drift apart.
//!
//! # Transaction Records
//!
//! Every authorization attempt records its outcome under the transaction id,
//! including `DECLINED` and `INVALID_ACCOUNT`. A new authorization of the same
//! id is refused only while it is `AUTHORIZED` or `COMPLETED`. Negative amounts
//! are declined before any record is touched, so balances never go below zero.
//!
//! # Thread Safety
//!
//! Accounts and transactions live in two `DashMap`s. Every read-then-write
//! of a balance happens while holding that account's entry lock. Operations
//! that touch both maps lock the transaction entry first and then at most one
//! account entry, so lock order is always transaction → account.
//!
//! # Currencies
//!
//! Each account keeps a single balance. The currency given to
//! [`Ledger::create_account`] is recorded on the account; the currency
//! arguments of the other operations are accepted for API compatibility and
//! logged, but do not select a separate balance.

use crate::core::traits::AccountService;
use crate::types::{AccountId, Currency, PaymentStatus};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

/// Ledger-side state of one account
#[derive(Debug, Clone, PartialEq)]
struct LedgerAccount {
    /// Currency the account was opened in
    currency: Currency,
    balance: Decimal,
}

/// Funds held between authorize and finalize/cancel
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub destination: AccountId,
    pub amount: Decimal,
}

/// Ledger-side record of a transaction id
#[derive(Debug, Clone, PartialEq)]
struct LedgerTransaction {
    source: AccountId,
    status: PaymentStatus,
    /// Present iff `status == Authorized`
    reservation: Option<Reservation>,
}

/// In-memory account ledger
///
/// Shared between request handlers behind an `Arc`; all methods take `&self`.
#[derive(Debug, Default)]
pub struct Ledger {
    accounts: DashMap<AccountId, LedgerAccount>,
    transactions: DashMap<String, LedgerTransaction>,
}

impl Ledger {
    /// Create an empty ledger with no accounts
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an account with a zero balance
    ///
    /// Calling this for an existing account resets its balance to zero.
    /// Open reservations against the account are not touched.
    pub fn create_account(&self, account: &str, currency: &Currency) {
        let previous = self.accounts.insert(
            account.to_string(),
            LedgerAccount {
                currency: *currency,
                balance: Decimal::ZERO,
            },
        );
        if let Some(previous) = previous {
            warn!(
                account,
                previous_currency = %previous.currency,
                previous_balance = %previous.balance,
                "account re-initialized, balance reset to zero"
            );
        } else {
            info!(account, currency = %currency, "account created");
        }
    }

    /// Current balance of an account, `None` if the account does not exist
    pub fn balance(&self, account: &str, _currency: &Currency) -> Option<Decimal> {
        self.accounts.get(account).map(|entry| entry.balance)
    }

    /// Last recorded outcome for a transaction id
    pub fn transaction_status(&self, tx_id: &str) -> Option<PaymentStatus> {
        self.transactions.get(tx_id).map(|entry| entry.status)
    }

    /// Reservation held for a transaction id, if it is authorized
    pub fn reservation(&self, tx_id: &str) -> Option<Reservation> {
        self.transactions
            .get(tx_id)
            .and_then(|entry| entry.reservation.clone())
    }

    /// Sum of all open reservations
    pub fn reserved_total(&self) -> Decimal {
        self.transactions
            .iter()
            .filter_map(|entry| entry.reservation.as_ref().map(|r| r.amount))
            .sum()
    }

    /// Debit `amount` from `source` if the account exists and covers it
    ///
    /// The balance check and the debit happen under the same entry lock.
    fn debit(&self, source: &str, amount: Decimal) -> Result<(), PaymentStatus> {
        let mut account = self
            .accounts
            .get_mut(source)
            .ok_or(PaymentStatus::InvalidAccount)?;

        if account.balance < amount {
            return Err(PaymentStatus::Declined);
        }

        account.balance = account
            .balance
            .checked_sub(amount)
            .ok_or(PaymentStatus::Error)?;
        Ok(())
    }

    /// Credit `amount` to an existing account
    fn credit(&self, account: &str, amount: Decimal) -> Result<(), PaymentStatus> {
        let mut entry = self
            .accounts
            .get_mut(account)
            .ok_or(PaymentStatus::Declined)?;

        entry.balance = entry
            .balance
            .checked_add(amount)
            .ok_or(PaymentStatus::Error)?;
        Ok(())
    }

    /// Resolve an authorized reservation by crediting `target(tx)`
    ///
    /// On success the transaction moves to `resolved`; on failure the
    /// reservation is left in place and the failure status is returned.
    fn resolve<F>(&self, tx_id: &str, resolved: PaymentStatus, target: F) -> PaymentStatus
    where
        F: FnOnce(&LedgerTransaction, &Reservation) -> AccountId,
    {
        let Some(mut tx) = self.transactions.get_mut(tx_id) else {
            warn!(tx_id, operation = %resolved, "unknown transaction");
            return PaymentStatus::Error;
        };

        let reservation = match (&tx.status, &tx.reservation) {
            (PaymentStatus::Authorized, Some(reservation)) => reservation.clone(),
            _ => {
                warn!(
                    tx_id,
                    status = %tx.status,
                    operation = %resolved,
                    "transaction is not authorized"
                );
                return PaymentStatus::Error;
            }
        };

        let account = target(&*tx, &reservation);
        if let Err(status) = self.credit(&account, reservation.amount) {
            warn!(tx_id, account = %account, %status, "reservation could not be credited");
            return status;
        }

        tx.status = resolved;
        tx.reservation = None;
        info!(tx_id, account = %account, amount = %reservation.amount, status = %resolved, "reservation resolved");
        resolved
    }
}

fn is_negative(amount: Decimal) -> bool {
    amount.is_sign_negative() && !amount.is_zero()
}

impl AccountService for Ledger {
    fn authorize_payment(
        &self,
        source: &str,
        destination: &str,
        amount: Decimal,
        currency: &Currency,
        tx_id: &str,
    ) -> PaymentStatus {
        if is_negative(amount) {
            warn!(tx_id, source, %amount, "negative amount refused");
            return PaymentStatus::Declined;
        }

        // Holding the transaction entry serializes authorizations of one tx id
        let entry = self.transactions.entry(tx_id.to_string());
        if let Entry::Occupied(ref occupied) = entry {
            let status = occupied.get().status;
            if matches!(status, PaymentStatus::Authorized | PaymentStatus::Completed) {
                warn!(tx_id, %status, "transaction already authorized");
                return PaymentStatus::Error;
            }
        }

        let record = match self.debit(source, amount) {
            Ok(()) => LedgerTransaction {
                source: source.to_string(),
                status: PaymentStatus::Authorized,
                reservation: Some(Reservation {
                    destination: destination.to_string(),
                    amount,
                }),
            },
            Err(status) => {
                warn!(tx_id, source, %amount, %currency, %status, "authorization refused");
                LedgerTransaction {
                    source: source.to_string(),
                    status,
                    reservation: None,
                }
            }
        };
        let status = record.status;
        match entry {
            Entry::Occupied(mut occupied) => {
                occupied.insert(record);
            }
            Entry::Vacant(vacant) => {
                vacant.insert(record);
            }
        }

        if status == PaymentStatus::Authorized {
            info!(tx_id, source, destination, %amount, %currency, "payment authorized");
        }
        status
    }

    fn cancel_payment(&self, tx_id: &str) -> PaymentStatus {
        self.resolve(tx_id, PaymentStatus::Cancelled, |tx, _| tx.source.clone())
    }

    fn finalize_payment(&self, tx_id: &str) -> PaymentStatus {
        self.resolve(tx_id, PaymentStatus::Completed, |_, reservation| {
            reservation.destination.clone()
        })
    }

    fn deposit(
        &self,
        account: &str,
        amount: Decimal,
        currency: &Currency,
        tx_id: &str,
    ) -> PaymentStatus {
        if is_negative(amount) {
            warn!(tx_id, account, %amount, "negative deposit refused");
            return PaymentStatus::Declined;
        }

        match self.credit(account, amount) {
            Ok(()) => {
                debug!(tx_id, account, %amount, %currency, "deposit completed");
                PaymentStatus::Completed
            }
            Err(status) => {
                warn!(tx_id, account, %amount, %status, "deposit refused");
                status
            }
        }
    }
}
