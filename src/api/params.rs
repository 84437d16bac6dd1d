//! Request parsing at the HTTP boundary
//!
//! Query strings and JSON bodies arrive as loosely typed text. This module
//! turns them into [`FilterParams`] and [`TransferData`], reporting the first
//! invalid value as a validation error.

use crate::types::{Currency, FilterParams, SortField, SortOrder, TransferData, TransferError, TransferStatus};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

const INVALID_LIMIT: &str = "Invalid numeric value in query parameter 'limit'";
const INVALID_ORDER: &str = "Invalid value in query parameter 'order'. Accepted values are asc, desc";
const INVALID_STATUS: &str = "Invalid value in query parameter 'status'";
const INVALID_CURRENCY: &str = "Invalid value in query parameter 'currency'";
const INVALID_AMOUNT: &str = "Invalid value in query parameter 'amount'";
const INVALID_SORT: &str = "Invalid field name in query parameter 'sort'";

/// Raw query string of `GET /transfer`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransferQuery {
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub status: Option<String>,
    pub currency: Option<String>,
    pub source: Option<String>,
    pub destination: Option<String>,
    pub title: Option<String>,
    pub amount: Option<String>,
}

/// Parse an optional query value, mapping any parse failure to `message`
fn parse_param<T: FromStr>(value: Option<&str>, message: &str) -> Result<Option<T>, TransferError> {
    value
        .map(|raw| raw.parse::<T>().map_err(|_| TransferError::validation(message)))
        .transpose()
}

impl TryFrom<TransferQuery> for FilterParams {
    type Error = TransferError;

    fn try_from(query: TransferQuery) -> Result<Self, Self::Error> {
        Ok(FilterParams {
            limit: parse_param::<usize>(query.limit.as_deref(), INVALID_LIMIT)?,
            sort: parse_param::<SortField>(query.sort.as_deref(), INVALID_SORT)?,
            order: parse_param::<SortOrder>(query.order.as_deref(), INVALID_ORDER)?.unwrap_or_default(),
            status: parse_param::<TransferStatus>(query.status.as_deref(), INVALID_STATUS)?,
            currency: parse_param::<Currency>(query.currency.as_deref(), INVALID_CURRENCY)?,
            source: query.source,
            destination: query.destination,
            title: query.title,
            amount: parse_param::<Decimal>(query.amount.as_deref(), INVALID_AMOUNT)?,
        })
    }
}

/// Amount as sent by the client, either a JSON string or a JSON number
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(serde_json::Number),
    Text(String),
}

impl AmountInput {
    /// Exact decimal value of the input
    ///
    /// Numbers are converted through their JSON text so `340.23` stays `340.23`.
    pub fn to_decimal(&self) -> Result<Decimal, TransferError> {
        let text = match self {
            AmountInput::Number(number) => number.to_string(),
            AmountInput::Text(text) => text.trim().to_string(),
        };
        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map_err(|_| TransferError::validation(format!("Invalid amount '{}'", text)))
    }
}

/// JSON body of `POST /transfer`
#[derive(Debug, Clone, Deserialize)]
pub struct TransferRequest {
    pub source: String,
    pub destination: String,
    pub amount: AmountInput,
    pub currency: String,
    #[serde(default)]
    pub title: String,
}

impl TransferRequest {
    /// Convert into validated core input
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unparseable amount, an unsupported
    /// currency, or data rejected by [`TransferData::validate`].
    pub fn into_transfer_data(self) -> Result<TransferData, TransferError> {
        let data = TransferData {
            amount: self.amount.to_decimal()?,
            currency: self.currency.parse()?,
            source: self.source,
            destination: self.destination,
            title: self.title,
        };
        data.validate()?;
        Ok(data)
    }
}
