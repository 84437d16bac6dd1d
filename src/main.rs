//! Rust Transfer Service
//!
//! HTTP server for creating, executing and cancelling money transfers
//! against an in-memory ledger.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --account PL61109010140000071219812874:PLN:1000 \
//!              --account CZ6508000000192000145399:PLN:0
//! cargo run -- --port 8080 --workers 4 --log-format json
//! ```
//!
//! # Exit Codes
//!
//! - 0: Clean shutdown after Ctrl-C
//! - 1: Startup or server error (port in use, runtime creation failed, etc.)

use rust_transfer_service::api::{self, AppState};
use rust_transfer_service::cli::{self, ServerConfig};
use rust_transfer_service::core::{AccountService, Ledger};
use rust_transfer_service::logging;
use rust_transfer_service::types::PaymentStatus;
use std::process;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

fn main() {
    let args = cli::parse_args();
    let config = args.to_server_config();

    if let Err(e) = logging::init_logging(&config.log) {
        eprintln!("Error: failed to initialise logging: {}", e);
        process::exit(1);
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.workers)
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to build tokio runtime");
            process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(config)) {
        error!(error = %e, "Server stopped with an error");
        process::exit(1);
    }
}

async fn run(config: ServerConfig) -> std::io::Result<()> {
    let ledger = Arc::new(seed_ledger(&config));
    let state = AppState::new(ledger);

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!(workers = config.workers, "Runtime started");
    api::serve(listener, state).await?;

    info!("Server stopped");
    Ok(())
}

/// Open and fund the configured accounts
fn seed_ledger(config: &ServerConfig) -> Ledger {
    let ledger = Ledger::new();
    for seed in &config.accounts {
        ledger.create_account(&seed.account, &seed.currency);
        if seed.balance.is_zero() {
            continue;
        }
        let tx_id = format!("seed-{}", seed.account);
        let status = ledger.deposit(&seed.account, seed.balance, &seed.currency, &tx_id);
        if status != PaymentStatus::Completed {
            warn!(account = %seed.account, %status, "Seed deposit failed");
        }
    }
    ledger
}
