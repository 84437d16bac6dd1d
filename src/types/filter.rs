//! Query parameters for listing transfers
//!
//! [`FilterParams`] is the typed form of a list request: optional equality
//! filters, an optional sort field, a sort direction and a result limit.
//! Sorting uses a closed set of fields, each with a typed comparator.

use super::currency::Currency;
use super::error::TransferError;
use super::transfer::{Transfer, TransferStatus};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::str::FromStr;

/// Number of transfers returned when the caller gives no limit
pub const DEFAULT_QUERY_LIMIT: usize = 100;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(TransferError::validation(format!(
                "Unknown sort order '{}'",
                s
            ))),
        }
    }
}

/// Transfer fields a listing can be sorted by
///
/// Each field compares with its native ordering: amounts numerically,
/// timestamps chronologically, statuses in lifecycle order, text fields
/// lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Timestamp,
    Status,
    Source,
    Destination,
    Amount,
    Currency,
    Title,
}

impl SortField {
    /// Compare two transfers on this field, ascending
    pub fn compare(&self, a: &Transfer, b: &Transfer) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Timestamp => a.timestamp.cmp(&b.timestamp),
            SortField::Status => a.status.cmp(&b.status),
            SortField::Source => a.source.cmp(&b.source),
            SortField::Destination => a.destination.cmp(&b.destination),
            SortField::Amount => a.amount.cmp(&b.amount),
            SortField::Currency => a.currency.code().cmp(b.currency.code()),
            SortField::Title => a.title.cmp(&b.title),
        }
    }
}

impl FromStr for SortField {
    type Err = TransferError;

    /// Field names match the JSON property names, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "id" => Ok(SortField::Id),
            "timestamp" => Ok(SortField::Timestamp),
            "status" => Ok(SortField::Status),
            "source" => Ok(SortField::Source),
            "destination" => Ok(SortField::Destination),
            "amount" => Ok(SortField::Amount),
            "currency" => Ok(SortField::Currency),
            "title" => Ok(SortField::Title),
            _ => Err(TransferError::validation(format!(
                "Unknown sort field '{}'",
                s
            ))),
        }
    }
}

/// Typed list request
///
/// Every filter is optional; an unset filter matches every transfer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    /// Maximum number of results, [`DEFAULT_QUERY_LIMIT`] when unset
    pub limit: Option<usize>,
    /// Sort field, creation time when unset
    pub sort: Option<SortField>,
    /// Direction applied to `sort`
    pub order: SortOrder,
    pub status: Option<TransferStatus>,
    pub currency: Option<Currency>,
    pub source: Option<String>,
    pub destination: Option<String>,
    pub title: Option<String>,
    pub amount: Option<Decimal>,
}

impl FilterParams {
    /// The effective limit
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_QUERY_LIMIT)
    }
}
