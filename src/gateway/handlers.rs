//! HTTP handlers
//!
//! Thin adapters: parse the request, call `AccountService` /
//! `TransferEngine`, wrap the result in `ApiResponse`.

pub mod account;
pub mod health;
pub mod transfer;

pub use account::{
    create_account, delete_account, deposit, get_account, list_account_transfers, list_accounts,
    withdraw,
};
pub use health::{HealthResponse, health_check};
pub use transfer::create_transfer;
