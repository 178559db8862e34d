use std::sync::Arc;

use crate::account::AccountService;
use crate::transfer::TransferEngine;

/// Shared gateway state, built once in `main`
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub transfers: Arc<TransferEngine>,
}

impl AppState {
    pub fn new(transfers: Arc<TransferEngine>) -> Self {
        Self {
            accounts: transfers.accounts().clone(),
            transfers,
        }
    }
}
