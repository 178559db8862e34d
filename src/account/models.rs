//! Account data model

use crate::core_types::AccountId;
use crate::money::Amount;

/// Ledger account
///
/// `balance` is never negative: `Amount` is unsigned and every debit goes
/// through `checked_sub`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub balance: Amount,
}

impl Account {
    pub fn new(id: AccountId, balance: Amount) -> Self {
        Self { id, balance }
    }
}
