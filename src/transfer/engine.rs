//! Transfer Engine
//!
//! Moves funds between two accounts as one atomic unit:
//!
//! 1. Validate endpoints and amount (`VALIDATED`)
//! 2. Lock both accounts in ascending id order, open a unit of work (`LOCKED`)
//! 3. Resolve both accounts, debit the source (`DEBITED`)
//! 4. Credit the target (`CREDITED`)
//! 5. Append the transfer record and commit (`RECORDED`)
//!
//! Any failure after validation rolls the unit of work back (`ABORTED`);
//! there are no compensating writes.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use super::models::Transfer;
use super::state::TransferState;
use crate::account::service::positive_amount;
use crate::account::{AccountGuard, AccountService};
use crate::core_types::AccountId;
use crate::error::BankError;
use crate::money::Amount;
use crate::store::UnitOfWork;

/// Per-request state tracker, logs every transition
struct Progress {
    state: TransferState,
    from: AccountId,
    to: AccountId,
}

impl Progress {
    fn new(from: AccountId, to: AccountId) -> Self {
        Self {
            state: TransferState::Validated,
            from,
            to,
        }
    }

    fn advance(&mut self, next: TransferState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        debug!(from = self.from, to = self.to, state = %next, prev = %self.state, "transfer state");
        self.state = next;
    }
}

pub struct TransferEngine {
    accounts: Arc<AccountService>,
}

impl TransferEngine {
    pub fn new(accounts: Arc<AccountService>) -> Self {
        Self { accounts }
    }

    pub fn accounts(&self) -> &Arc<AccountService> {
        &self.accounts
    }

    /// Move `amount` from `from_id` to `to_id`
    ///
    /// # Errors
    /// - `InvalidTransfer` if both ids are equal (checked first)
    /// - `InvalidAmount` if `amount` is not strictly positive or has more than 2 decimals
    /// - `NotFound` if either account does not exist
    /// - `InsufficientFunds` if the source balance is below `amount`
    /// - `Busy` if the account locks cannot be acquired in time
    /// - `StoreFailure` on persistence errors (nothing is applied)
    pub async fn transfer(
        &self,
        from_id: AccountId,
        to_id: AccountId,
        amount: Decimal,
    ) -> Result<Transfer, BankError> {
        if from_id == to_id {
            return Err(BankError::InvalidTransfer);
        }
        let amount = positive_amount(amount)?;

        let mut progress = Progress::new(from_id, to_id);
        match self.execute(&mut progress, amount).await {
            Ok(transfer) => {
                info!(
                    transfer_id = transfer.id,
                    from = from_id,
                    to = to_id,
                    amount = %amount,
                    "Transfer committed"
                );
                Ok(transfer)
            }
            Err(e) => {
                progress.advance(TransferState::Aborted);
                warn!(
                    from = from_id,
                    to = to_id,
                    amount = %amount,
                    error = %e,
                    retryable = e.is_retryable(),
                    "Transfer aborted"
                );
                Err(e)
            }
        }
    }

    /// All transfers where `account_id` is source or destination, oldest first.
    ///
    /// Records of deleted accounts are still returned.
    pub async fn list_by_account(&self, account_id: AccountId) -> Result<Vec<Transfer>, BankError> {
        let mut uow = self.accounts.store().begin().await?;
        let transfers = uow.list_transfers_by_account(account_id).await?;
        uow.commit().await?;
        Ok(transfers)
    }

    async fn execute(&self, progress: &mut Progress, amount: Amount) -> Result<Transfer, BankError> {
        let guard = self
            .accounts
            .locks()
            .lock_pair(progress.from, progress.to)
            .await?;
        let mut uow = self.accounts.store().begin().await?;
        progress.advance(TransferState::Locked);

        let applied = self.apply(&guard, uow.as_mut(), progress, amount).await;
        match applied {
            Ok(transfer) => {
                uow.commit().await?;
                progress.advance(TransferState::Recorded);
                Ok(transfer)
            }
            Err(e) => {
                if let Err(rb) = uow.rollback().await {
                    error!(from = progress.from, to = progress.to, error = %rb, "Rollback failed");
                }
                Err(e)
            }
        }
        // guard released here, after commit/rollback
    }

    async fn apply(
        &self,
        guard: &AccountGuard,
        uow: &mut dyn UnitOfWork,
        progress: &mut Progress,
        amount: Amount,
    ) -> Result<Transfer, BankError> {
        // Resolve in lock order so store row locks follow the same order
        for id in guard.ids() {
            if uow.get_account_for_update(*id).await?.is_none() {
                return Err(BankError::NotFound(*id));
            }
        }

        self.accounts
            .debit_locked(guard, uow, progress.from, amount)
            .await?;
        progress.advance(TransferState::Debited);

        self.accounts
            .credit_locked(guard, uow, progress.to, amount)
            .await?;
        progress.advance(TransferState::Credited);

        uow.insert_transfer(progress.from, progress.to, amount, Utc::now())
            .await
    }
}
