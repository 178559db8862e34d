//! Transfer record

use chrono::{DateTime, Utc};

use crate::core_types::{AccountId, TransferId};
use crate::money::Amount;

/// Completed transfer. Immutable once stored; never updated or deleted,
/// and it outlives the accounts it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub id: TransferId,
    pub from_account_id: AccountId,
    pub to_account_id: AccountId,
    pub amount: Amount,
    pub created_at: DateTime<Utc>,
}

impl Transfer {
    /// Whether `account_id` is the source or the destination
    pub fn involves(&self, account_id: AccountId) -> bool {
        self.from_account_id == account_id || self.to_account_id == account_id
    }
}
