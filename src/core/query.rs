//! Filter / sort / limit pipeline for listing transfers
//!
//! The engine runs over a full scan of the store: first the equality
//! filters, then the sort, then truncation to the limit.
//!
//! Without a sort field results are ordered by creation time, oldest first,
//! and the requested direction does not apply. Ties on the sort key are broken
//! by store insertion order so listings are deterministic.

use crate::types::{FilterParams, SortOrder, Transfer};
use std::cmp::Ordering;

/// Query pipeline bound to one set of filter parameters
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    params: &'a FilterParams,
}

impl<'a> QueryEngine<'a> {
    pub fn new(params: &'a FilterParams) -> Self {
        Self { params }
    }

    /// Whether a transfer passes every set equality filter
    pub fn matches(&self, transfer: &Transfer) -> bool {
        let p = self.params;
        p.status.is_none_or(|status| transfer.status == status)
            && p.currency.is_none_or(|currency| transfer.currency == currency)
            && p.source.as_ref().is_none_or(|source| transfer.source == *source)
            && p
                .destination
                .as_ref()
                .is_none_or(|destination| transfer.destination == *destination)
            && p.title.as_ref().is_none_or(|title| transfer.title == *title)
            && p.amount.is_none_or(|amount| transfer.amount == amount)
    }

    /// Ordering of two transfers under these parameters
    pub fn compare(&self, a: &Transfer, b: &Transfer) -> Ordering {
        let primary = match self.params.sort {
            Some(field) => {
                let ordering = field.compare(a, b);
                match self.params.order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            }
            None => a.timestamp.cmp(&b.timestamp),
        };
        primary.then_with(|| a.sequence.cmp(&b.sequence))
    }

    /// Run the pipeline over a snapshot of transfers
    pub fn run<I>(&self, transfers: I) -> Vec<Transfer>
    where
        I: IntoIterator<Item = Transfer>,
    {
        let mut selected: Vec<Transfer> = transfers
            .into_iter()
            .filter(|transfer| self.matches(transfer))
            .collect();
        selected.sort_by(|a, b| self.compare(a, b));
        selected.truncate(self.params.limit());
        selected
    }
}
