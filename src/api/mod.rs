//! HTTP interface
//!
//! Routes:
//!
//! | Method | Path                  | Action                     |
//! |--------|-----------------------|----------------------------|
//! | POST   | `/transfer`           | create a transfer          |
//! | GET    | `/transfer`           | list with filters/sort     |
//! | GET    | `/transfer/{id}`      | transfer details           |
//! | PUT    | `/transfer/{id}`      | execute                    |
//! | DELETE | `/transfer/{id}`      | cancel                     |
//! | DELETE | `/deleteAllTransfers` | remove every transfer      |
//! | GET    | `/health`             | liveness probe             |

pub mod handlers;
pub mod params;
pub mod response;
pub mod state;

pub use response::{ApiError, ServiceResponse};
pub use state::AppState;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{delete, get};
use axum::Router;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Build the router with request logging
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/transfer",
            get(handlers::list_transfers).post(handlers::create_transfer),
        )
        .route(
            "/transfer/{id}",
            get(handlers::get_transfer)
                .put(handlers::execute_transfer)
                .delete(handlers::cancel_transfer),
        )
        .route("/deleteAllTransfers", delete(handlers::delete_all_transfers))
        .route("/health", get(handlers::health))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

/// Serve until Ctrl-C
///
/// # Errors
///
/// Returns the I/O error that stopped the server.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Transfer service listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        %method,
        %uri,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Request handled"
    );
    response
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => {
            error!(error = %err, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
