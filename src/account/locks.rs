//! Per-account mutual exclusion
//!
//! One async mutex per account id, stored in a `DashMap` so unrelated
//! accounts never contend on a shared lock. Multi-account operations lock
//! in ascending id order, which rules out circular waits between two
//! transfers moving funds in opposite directions.
//!
//! Every acquisition is bounded by `timeout`; running out of time yields
//! [`BankError::Busy`].

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::core_types::AccountId;
use crate::error::BankError;

type LockTable = DashMap<AccountId, Arc<Mutex<()>>>;

/// Held locks; released on drop
#[derive(Debug)]
pub struct AccountGuard {
    ids: Vec<AccountId>,
    guards: Vec<OwnedMutexGuard<()>>,
    table: Arc<LockTable>,
}

impl AccountGuard {
    /// Locked account ids, in acquisition order
    pub fn ids(&self) -> &[AccountId] {
        &self.ids
    }
}

impl Drop for AccountGuard {
    fn drop(&mut self) {
        // Unlock first so idle entries are referenced by the table alone
        self.guards.clear();
        evict_idle(&self.table, &self.ids);
    }
}

/// Remove entries nobody holds or waits on. Waiters keep a clone of the
/// `Arc`, so a contended entry always survives.
fn evict_idle(table: &LockTable, ids: &[AccountId]) {
    for id in ids {
        table.remove_if(id, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

/// Lock table keyed by account id. Only accounts currently locked or
/// waited on have an entry.
pub struct AccountLocks {
    table: Arc<LockTable>,
    timeout: Duration,
}

impl AccountLocks {
    pub fn new(timeout: Duration) -> Self {
        Self {
            table: Arc::new(DashMap::new()),
            timeout,
        }
    }

    fn handle(&self, id: AccountId) -> Arc<Mutex<()>> {
        // Clone the Arc out so the DashMap shard lock is released before awaiting
        self.table
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Lock a single account
    pub async fn lock(&self, id: AccountId) -> Result<AccountGuard, BankError> {
        self.lock_all(&[id]).await
    }

    /// Lock two accounts in ascending id order, regardless of argument order
    pub async fn lock_pair(&self, a: AccountId, b: AccountId) -> Result<AccountGuard, BankError> {
        self.lock_all(&[a, b]).await
    }

    /// Lock a set of accounts in ascending id order within one timeout budget.
    /// Duplicate ids are locked once.
    pub async fn lock_all(&self, ids: &[AccountId]) -> Result<AccountGuard, BankError> {
        let mut ordered = ids.to_vec();
        ordered.sort_unstable();
        ordered.dedup();

        let handles: Vec<_> = ordered.iter().map(|id| self.handle(*id)).collect();
        let acquire = async move {
            let mut guards = Vec::with_capacity(handles.len());
            for handle in handles {
                guards.push(handle.lock_owned().await);
            }
            guards
        };

        // On timeout the future is dropped here, releasing partial acquisitions
        let acquired = tokio::time::timeout(self.timeout, acquire).await;
        match acquired {
            Ok(guards) => Ok(AccountGuard {
                ids: ordered,
                guards,
                table: self.table.clone(),
            }),
            Err(_) => {
                evict_idle(&self.table, &ordered);
                tracing::warn!(accounts = ?ordered, timeout_ms = self.timeout.as_millis() as u64, "Account lock timed out");
                Err(BankError::Busy)
            }
        }
    }

    /// Number of entries in the lock table
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.table.len()
    }
}
