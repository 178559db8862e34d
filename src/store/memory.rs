//! In-memory store
//!
//! Committed state lives behind one mutex. A unit of work stages its writes
//! in an overlay and reads through it; `commit` validates the overlay
//! against committed state and applies it in a single critical section, so
//! readers never observe half of a unit of work.
//!
//! Isolation between concurrent writers of the same account is provided by
//! the caller's per-account locks, not by this store.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{AccountStore, Store, TransferStore, UnitOfWork};
use crate::account::Account;
use crate::core_types::{AccountId, TransferId};
use crate::error::BankError;
use crate::money::Amount;
use crate::transfer::Transfer;

#[derive(Default)]
struct Committed {
    accounts: BTreeMap<AccountId, Account>,
    transfers: Vec<Transfer>,
}

struct Shared {
    committed: Mutex<Committed>,
    next_account_id: AtomicI64,
    next_transfer_id: AtomicI64,
}

impl Shared {
    fn lock(&self) -> Result<MutexGuard<'_, Committed>, BankError> {
        self.committed
            .lock()
            .map_err(|_| BankError::StoreFailure("memory store mutex poisoned".to_string()))
    }
}

/// Process-local store, used when no PostgreSQL URL is configured
#[derive(Clone)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                committed: Mutex::new(Committed::default()),
                next_account_id: AtomicI64::new(1),
                next_transfer_id: AtomicI64::new(1),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, BankError> {
        Ok(Box::new(MemoryUnitOfWork {
            shared: self.shared.clone(),
            accounts: BTreeMap::new(),
            inserted: BTreeSet::new(),
            transfers: Vec::new(),
        }))
    }

    async fn health_check(&self) -> Result<(), BankError> {
        self.shared.lock().map(|_| ())
    }
}

/// Staged changes of one unit of work
pub struct MemoryUnitOfWork {
    shared: Arc<Shared>,
    /// `Some` = inserted or updated, `None` = deleted
    accounts: BTreeMap<AccountId, Option<Account>>,
    inserted: BTreeSet<AccountId>,
    transfers: Vec<Transfer>,
}

impl MemoryUnitOfWork {
    fn visible_account(&self, id: AccountId) -> Result<Option<Account>, BankError> {
        if let Some(staged) = self.accounts.get(&id) {
            return Ok(staged.clone());
        }
        Ok(self.shared.lock()?.accounts.get(&id).cloned())
    }
}

#[async_trait]
impl AccountStore for MemoryUnitOfWork {
    async fn insert_account(&mut self, balance: Amount) -> Result<Account, BankError> {
        let id = self.shared.next_account_id.fetch_add(1, Ordering::SeqCst);
        let account = Account::new(id, balance);
        self.accounts.insert(id, Some(account.clone()));
        self.inserted.insert(id);
        Ok(account)
    }

    async fn get_account(&mut self, id: AccountId) -> Result<Option<Account>, BankError> {
        self.visible_account(id)
    }

    // Writers are serialized by the caller's account locks
    async fn get_account_for_update(
        &mut self,
        id: AccountId,
    ) -> Result<Option<Account>, BankError> {
        self.visible_account(id)
    }

    async fn list_accounts(&mut self) -> Result<Vec<Account>, BankError> {
        let mut merged = self.shared.lock()?.accounts.clone();
        for (id, staged) in &self.accounts {
            match staged {
                Some(account) => {
                    merged.insert(*id, account.clone());
                }
                None => {
                    merged.remove(id);
                }
            }
        }
        Ok(merged.into_values().collect())
    }

    async fn update_balance(
        &mut self,
        id: AccountId,
        new_balance: Amount,
    ) -> Result<(), BankError> {
        let mut account = self.visible_account(id)?.ok_or(BankError::NotFound(id))?;
        account.balance = new_balance;
        self.accounts.insert(id, Some(account));
        Ok(())
    }

    async fn delete_account(&mut self, id: AccountId) -> Result<bool, BankError> {
        if self.visible_account(id)?.is_none() {
            return Ok(false);
        }
        self.accounts.insert(id, None);
        Ok(true)
    }
}

#[async_trait]
impl TransferStore for MemoryUnitOfWork {
    async fn insert_transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
        created_at: DateTime<Utc>,
    ) -> Result<Transfer, BankError> {
        let id: TransferId = self.shared.next_transfer_id.fetch_add(1, Ordering::SeqCst);
        let transfer = Transfer {
            id,
            from_account_id: from,
            to_account_id: to,
            amount,
            created_at,
        };
        self.transfers.push(transfer.clone());
        Ok(transfer)
    }

    async fn list_transfers_by_account(
        &mut self,
        id: AccountId,
    ) -> Result<Vec<Transfer>, BankError> {
        let mut found: Vec<Transfer> = self
            .shared
            .lock()?
            .transfers
            .iter()
            .filter(|t| t.involves(id))
            .cloned()
            .collect();
        found.extend(self.transfers.iter().filter(|t| t.involves(id)).cloned());
        found.sort_by_key(|t| t.id);
        Ok(found)
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(self: Box<Self>) -> Result<(), BankError> {
        let MemoryUnitOfWork {
            shared,
            accounts,
            inserted,
            transfers,
        } = *self;
        let mut committed = shared.lock()?;

        // Validate before applying anything: an update to an account that
        // another unit of work deleted must not resurrect it.
        for (id, staged) in &accounts {
            if staged.is_some() && !inserted.contains(id) && !committed.accounts.contains_key(id) {
                return Err(BankError::StoreFailure(format!(
                    "account {} was deleted concurrently",
                    id
                )));
            }
        }

        for (id, staged) in accounts {
            match staged {
                Some(account) => {
                    committed.accounts.insert(id, account);
                }
                None => {
                    committed.accounts.remove(&id);
                }
            }
        }
        committed.transfers.extend(transfers);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), BankError> {
        Ok(())
    }
}
