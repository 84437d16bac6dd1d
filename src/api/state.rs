//! Shared application state

use crate::core::{Ledger, TransferCoordinator, TransferStore};
use std::sync::Arc;

/// State handed to every handler
///
/// Cloning is cheap; all clones share one coordinator, store and ledger.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<TransferCoordinator>,
}

impl AppState {
    /// Build the service graph around an existing ledger
    ///
    /// The transfer store starts empty.
    pub fn new(ledger: Arc<Ledger>) -> Self {
        let store = Arc::new(TransferStore::new());
        Self {
            coordinator: Arc::new(TransferCoordinator::new(store, ledger)),
        }
    }
}
