use crate::logging::{LogConfig, LogFormat};
use crate::types::{Currency, TransferError};
use clap::Parser;
use rust_decimal::Decimal;
use std::str::FromStr;

/// In-memory money transfer service
#[derive(Parser, Debug)]
#[command(name = "transfer-service")]
#[command(about = "In-memory money transfer service with a two-phase ledger", long_about = None)]
pub struct CliArgs {
    /// Address to bind
    #[arg(long, value_name = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, value_name = "PORT", default_value_t = 4567)]
    pub port: u16,

    /// Number of tokio worker threads
    #[arg(
        long = "workers",
        value_name = "COUNT",
        help = "Number of worker threads (default: CPU cores)"
    )]
    pub workers: Option<usize>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long = "log-level", value_name = "FILTER", default_value = "info")]
    pub log_level: String,

    /// Log line format
    #[arg(long = "log-format", value_name = "FORMAT", default_value = "text")]
    pub log_format: LogFormat,

    /// Ledger account opened at startup, may be repeated
    #[arg(
        long = "account",
        value_name = "ID:CURRENCY:BALANCE",
        help = "Seed ledger account, e.g. PL61109010140000071219812874:PLN:1000.00"
    )]
    pub accounts: Vec<AccountSeed>,
}

/// Ledger account created and funded at startup
#[derive(Clone, Debug, PartialEq)]
pub struct AccountSeed {
    pub account: String,
    pub currency: Currency,
    pub balance: Decimal,
}

impl FromStr for AccountSeed {
    type Err = TransferError;

    /// Parse `ID:CURRENCY:BALANCE`; the id is everything before the last two colons
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.rsplitn(3, ':');
        let (Some(balance), Some(currency), Some(account)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(TransferError::validation(format!(
                "Expected ID:CURRENCY:BALANCE, got '{}'",
                s
            )));
        };

        if account.trim().is_empty() {
            return Err(TransferError::validation("Account id must not be empty"));
        }
        let balance = Decimal::from_str(balance.trim()).map_err(|_| {
            TransferError::validation(format!("Invalid balance '{}'", balance))
        })?;
        if balance.is_sign_negative() && !balance.is_zero() {
            return Err(TransferError::validation(format!(
                "Balance must not be negative: {}",
                balance
            )));
        }

        Ok(AccountSeed {
            account: account.trim().to_string(),
            currency: currency.parse()?,
            balance,
        })
    }
}

/// Resolved server settings
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub log: LogConfig,
    pub accounts: Vec<AccountSeed>,
}

impl ServerConfig {
    /// `host:port` for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl CliArgs {
    /// Create a ServerConfig from CLI arguments
    ///
    /// A missing or zero worker count falls back to the number of CPU cores;
    /// a zero value also prints a warning to stderr, since logging is not
    /// initialised yet at this point.
    pub fn to_server_config(&self) -> ServerConfig {
        let default_workers = num_cpus::get();
        let workers = match self.workers {
            Some(0) => {
                eprintln!(
                    "Warning: --workers 0 is invalid, using {} worker threads",
                    default_workers
                );
                default_workers
            }
            Some(count) => count,
            None => default_workers,
        };

        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            workers,
            log: LogConfig {
                level: self.log_level.clone(),
                format: self.log_format,
            },
            accounts: self.accounts.clone(),
        }
    }
}
