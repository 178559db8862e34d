//! Account service
//!
//! Owns account creation, lookup, deletion and every balance mutation.
//! Single-account mutations hold that account's lock for the whole
//! read-modify-write and run inside one unit of work.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info};

use super::locks::{AccountGuard, AccountLocks};
use super::models::Account;
use crate::core_types::AccountId;
use crate::error::BankError;
use crate::money::Amount;
use crate::store::{Store, UnitOfWork};

pub struct AccountService {
    store: Arc<dyn Store>,
    locks: Arc<AccountLocks>,
}

/// Parse a strictly positive mutation amount
pub(crate) fn positive_amount(amount: Decimal) -> Result<Amount, BankError> {
    let amount = Amount::try_from_decimal(amount)?;
    if amount.is_zero() {
        return Err(BankError::InvalidAmount);
    }
    Ok(amount)
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>, locks: Arc<AccountLocks>) -> Self {
        Self { store, locks }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub(crate) fn locks(&self) -> &AccountLocks {
        &self.locks
    }

    /// Create an account with the given starting balance (`0` for none)
    pub async fn create(&self, initial_balance: Decimal) -> Result<Account, BankError> {
        let balance = Amount::try_from_decimal(initial_balance)?;
        let mut uow = self.store.begin().await?;
        let account = uow.insert_account(balance).await?;
        uow.commit().await?;
        info!(account_id = account.id, balance = %account.balance, "Account created");
        Ok(account)
    }

    /// Snapshot of all accounts, ordered by id
    pub async fn find_all(&self) -> Result<Vec<Account>, BankError> {
        let mut uow = self.store.begin().await?;
        let accounts = uow.list_accounts().await?;
        uow.commit().await?;
        Ok(accounts)
    }

    pub async fn find_by_id(&self, id: AccountId) -> Result<Account, BankError> {
        let mut uow = self.store.begin().await?;
        let account = uow.get_account(id).await?;
        uow.commit().await?;
        account.ok_or(BankError::NotFound(id))
    }

    /// Delete an account. Transfers that reference it are kept.
    pub async fn delete(&self, id: AccountId) -> Result<(), BankError> {
        let _guard = self.locks.lock(id).await?;
        let mut uow = self.store.begin().await?;
        if !uow.delete_account(id).await? {
            return Err(BankError::NotFound(id));
        }
        uow.commit().await?;
        info!(account_id = id, "Account deleted");
        Ok(())
    }

    /// Withdraw from one account
    pub async fn debit(&self, id: AccountId, amount: Decimal) -> Result<Account, BankError> {
        let amount = positive_amount(amount)?;
        let guard = self.locks.lock(id).await?;
        let mut uow = self.store.begin().await?;
        let account = self.debit_locked(&guard, uow.as_mut(), id, amount).await?;
        uow.commit().await?;
        info!(account_id = id, amount = %amount, balance = %account.balance, "Account debited");
        Ok(account)
    }

    /// Deposit into one account
    pub async fn credit(&self, id: AccountId, amount: Decimal) -> Result<Account, BankError> {
        let amount = positive_amount(amount)?;
        let guard = self.locks.lock(id).await?;
        let mut uow = self.store.begin().await?;
        let account = self.credit_locked(&guard, uow.as_mut(), id, amount).await?;
        uow.commit().await?;
        info!(account_id = id, amount = %amount, balance = %account.balance, "Account credited");
        Ok(account)
    }

    /// Debit inside an open unit of work. The caller must hold `id`'s lock,
    /// which `guard` proves.
    pub(crate) async fn debit_locked(
        &self,
        guard: &AccountGuard,
        uow: &mut dyn UnitOfWork,
        id: AccountId,
        amount: Amount,
    ) -> Result<Account, BankError> {
        debug_assert!(guard.ids().contains(&id));
        let mut account = uow
            .get_account_for_update(id)
            .await?
            .ok_or(BankError::NotFound(id))?;
        account.balance = account
            .balance
            .checked_sub(amount)
            .ok_or(BankError::InsufficientFunds)?;
        uow.update_balance(id, account.balance).await?;
        debug!(account_id = id, amount = %amount, "debit staged");
        Ok(account)
    }

    /// Credit inside an open unit of work; same locking contract as
    /// [`Self::debit_locked`].
    pub(crate) async fn credit_locked(
        &self,
        guard: &AccountGuard,
        uow: &mut dyn UnitOfWork,
        id: AccountId,
        amount: Amount,
    ) -> Result<Account, BankError> {
        debug_assert!(guard.ids().contains(&id));
        let mut account = uow
            .get_account_for_update(id)
            .await?
            .ok_or(BankError::NotFound(id))?;
        account.balance = account
            .balance
            .checked_add(amount)
            .ok_or(BankError::InvalidAmount)?;
        uow.update_balance(id, account.balance).await?;
        debug!(account_id = id, amount = %amount, "credit staged");
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn service() -> AccountService {
        AccountService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(AccountLocks::new(Duration::from_millis(500))),
        )
    }

    #[tokio::test]
    async fn test_create_defaults_and_reads_back() {
        let svc = service();
        let account = svc.create(Decimal::ZERO).await.unwrap();
        assert_eq!(account.balance, Amount::ZERO);
        assert_eq!(svc.find_by_id(account.id).await.unwrap(), account);
    }

    #[tokio::test]
    async fn test_create_negative_balance_is_invalid() {
        let svc = service();
        assert_eq!(svc.create(dec!(-1)).await, Err(BankError::InvalidAmount));
        assert!(svc.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_all_reflects_deletes() {
        let svc = service();
        let a = svc.create(dec!(1)).await.unwrap();
        let b = svc.create(dec!(2)).await.unwrap();
        let c = svc.create(dec!(3)).await.unwrap();
        svc.delete(b.id).await.unwrap();

        let ids: Vec<_> = svc.find_all().await.unwrap().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);
    }

    #[tokio::test]
    async fn test_missing_account_is_not_found() {
        let svc = service();
        assert_eq!(svc.find_by_id(42).await, Err(BankError::NotFound(42)));
        assert_eq!(svc.delete(42).await, Err(BankError::NotFound(42)));
        assert_eq!(svc.credit(42, dec!(1)).await, Err(BankError::NotFound(42)));
        assert_eq!(svc.debit(42, dec!(1)).await, Err(BankError::NotFound(42)));
    }

    #[tokio::test]
    async fn test_debit_and_credit() {
        let svc = service();
        let account = svc.create(dec!(100)).await.unwrap();

        let after = svc.debit(account.id, dec!(30.50)).await.unwrap();
        assert_eq!(after.balance.to_string(), "69.50");

        let after = svc.credit(account.id, dec!(0.50)).await.unwrap();
        assert_eq!(after.balance.to_string(), "70.00");
        assert_eq!(svc.find_by_id(account.id).await.unwrap().balance, after.balance);
    }

    #[tokio::test]
    async fn test_debit_insufficient_funds_leaves_balance() {
        let svc = service();
        let account = svc.create(dec!(10)).await.unwrap();
        assert_eq!(
            svc.debit(account.id, dec!(10.01)).await,
            Err(BankError::InsufficientFunds)
        );
        assert_eq!(
            svc.find_by_id(account.id).await.unwrap().balance,
            Amount::from_minor(1000)
        );
        // Draining to exactly zero is allowed
        assert_eq!(
            svc.debit(account.id, dec!(10)).await.unwrap().balance,
            Amount::ZERO
        );
    }

    #[tokio::test]
    async fn test_non_positive_mutation_amounts_rejected() {
        let svc = service();
        let account = svc.create(dec!(10)).await.unwrap();
        assert_eq!(svc.debit(account.id, dec!(0)).await, Err(BankError::InvalidAmount));
        assert_eq!(svc.credit(account.id, dec!(-5)).await, Err(BankError::InvalidAmount));
        assert_eq!(svc.credit(account.id, dec!(0.001)).await, Err(BankError::InvalidAmount));
    }

    #[tokio::test]
    async fn test_credit_past_max_is_invalid() {
        let svc = service();
        let near_max = Decimal::from(i64::MAX) / dec!(100);
        let account = svc.create(near_max).await.unwrap();
        assert_eq!(svc.credit(account.id, dec!(0.01)).await, Err(BankError::InvalidAmount));
        assert_eq!(
            svc.find_by_id(account.id).await.unwrap().balance.minor(),
            i64::MAX as u64
        );
    }

    #[tokio::test]
    async fn test_unknown_ids_leave_no_lock_entries() {
        let svc = service();
        let account = svc.create(dec!(5)).await.unwrap();
        for id in 100..5_100 {
            assert_eq!(svc.credit(id, dec!(1)).await, Err(BankError::NotFound(id)));
            assert_eq!(svc.debit(id, dec!(1)).await, Err(BankError::NotFound(id)));
            assert_eq!(svc.delete(id).await, Err(BankError::NotFound(id)));
        }
        svc.credit(account.id, dec!(1)).await.unwrap();
        svc.delete(account.id).await.unwrap();
        assert_eq!(svc.locks().len(), 0);
    }

    #[tokio::test]
    async fn test_mutation_waits_for_lock_then_times_out() {
        let svc = service();
        let account = svc.create(dec!(10)).await.unwrap();
        let _held = svc.locks().lock(account.id).await.unwrap();
        assert_eq!(svc.credit(account.id, dec!(1)).await, Err(BankError::Busy));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_debits_never_overdraw() {
        let svc = Arc::new(service());
        let account = svc.create(dec!(10)).await.unwrap();

        let mut tasks = Vec::new();
        for _ in 0..25 {
            let svc = svc.clone();
            tasks.push(tokio::spawn(async move { svc.debit(account.id, dec!(1)).await }));
        }
        let mut succeeded = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => succeeded += 1,
                Err(e) => assert_eq!(e, BankError::InsufficientFunds),
            }
        }
        assert_eq!(succeeded, 10);
        assert_eq!(svc.find_by_id(account.id).await.unwrap().balance, Amount::ZERO);
    }
}
