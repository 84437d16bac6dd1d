//! Accepted currency codes
//!
//! Transfers may only be denominated in one of a closed set of ISO 4217
//! codes. Codes are matched case-insensitively and stored upper case.

use super::error::TransferError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// ISO 4217 codes accepted by the service
pub const ACCEPTED_CURRENCIES: &[&str] = &[
    "JPY", "CNY", "SDG", "RON", "MKD", "MXN", "CAD", "ZAR", "AUD", "NOK", "ILS", "ISK", "SYP",
    "LYD", "UYU", "YER", "CSD", "EEK", "THB", "IDR", "LBP", "AED", "BOB", "QAR", "BHD", "HNL",
    "HRK", "COP", "ALL", "DKK", "MYR", "SEK", "RSD", "BGN", "DOP", "KRW", "LVL", "VEF", "CZK",
    "TND", "KWD", "VND", "JOD", "NZD", "PAB", "CLP", "PEN", "GBP", "DZD", "CHF", "RUB", "UAH",
    "ARS", "SAR", "EGP", "INR", "PYG", "TWD", "TRY", "BAM", "OMR", "SGD", "MAD", "BYR", "NIO",
    "HKD", "LTL", "SKK", "GTQ", "BRL", "EUR", "HUF", "IQD", "CRC", "PHP", "SVC", "PLN", "USD",
];

/// A currency code known to be in [`ACCEPTED_CURRENCIES`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Currency(&'static str);

impl Currency {
    /// The upper-case ISO code
    pub fn code(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl FromStr for Currency {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        ACCEPTED_CURRENCIES
            .iter()
            .copied()
            .find(|code| *code == upper)
            .map(Currency)
            .ok_or_else(|| TransferError::validation(format!("Unsupported currency '{}'", s)))
    }
}

impl TryFrom<String> for Currency {
    type Error = TransferError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// The code is borrowed from ACCEPTED_CURRENCIES, never from the input
impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Currency::try_from(raw).map_err(serde::de::Error::custom)
    }
}
