//! Store contracts
//!
//! The core reaches persistence only through these traits, so the backend
//! (in-memory or PostgreSQL) is chosen once at startup and passed around as
//! `Arc<dyn Store>`.
//!
//! Every read and write happens inside a [`UnitOfWork`]. A unit of work
//! either commits all of its changes or none of them; dropping it without
//! calling [`UnitOfWork::commit`] discards everything it staged.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::account::Account;
use crate::core_types::AccountId;
use crate::error::BankError;
use crate::money::Amount;
use crate::transfer::Transfer;

/// Account persistence
#[async_trait]
pub trait AccountStore: Send {
    /// Insert a new account; the store assigns the id
    async fn insert_account(&mut self, balance: Amount) -> Result<Account, BankError>;

    /// Fetch one account without locking it
    async fn get_account(&mut self, id: AccountId) -> Result<Option<Account>, BankError>;

    /// Fetch one account for a read-modify-write. PostgreSQL takes the row
    /// lock until the unit of work ends.
    async fn get_account_for_update(
        &mut self,
        id: AccountId,
    ) -> Result<Option<Account>, BankError>;

    /// All accounts ordered by id
    async fn list_accounts(&mut self) -> Result<Vec<Account>, BankError>;

    /// Overwrite the balance; `NotFound` if the account does not exist
    async fn update_balance(&mut self, id: AccountId, new_balance: Amount)
    -> Result<(), BankError>;

    /// Remove the account; returns `false` if it did not exist
    async fn delete_account(&mut self, id: AccountId) -> Result<bool, BankError>;
}

/// Append-only transfer log
#[async_trait]
pub trait TransferStore: Send {
    async fn insert_transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
        created_at: DateTime<Utc>,
    ) -> Result<Transfer, BankError>;

    /// Transfers where the account is source or destination, ordered by id
    async fn list_transfers_by_account(
        &mut self,
        id: AccountId,
    ) -> Result<Vec<Transfer>, BankError>;
}

/// Atomic unit of work spanning account and transfer operations
#[async_trait]
pub trait UnitOfWork: AccountStore + TransferStore {
    async fn commit(self: Box<Self>) -> Result<(), BankError>;

    async fn rollback(self: Box<Self>) -> Result<(), BankError>;
}

/// Store backend
#[async_trait]
pub trait Store: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// Open a new unit of work
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, BankError>;

    /// Check the backend is reachable
    async fn health_check(&self) -> Result<(), BankError>;
}
