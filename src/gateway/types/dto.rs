//! Request and response bodies
//!
//! Amounts always travel as strings (`"30.00"`) to avoid float precision loss.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::response::ApiError;
use crate::account::Account;
use crate::core_types::{AccountId, TransferId};
use crate::error::BankError;
use crate::money::Amount;
use crate::transfer::Transfer;

/// Parse a client amount string; format errors count as an invalid amount
pub fn parse_decimal(s: &str) -> Result<Decimal, ApiError> {
    Decimal::from_str(s.trim()).map_err(|_| ApiError::from(BankError::InvalidAmount))
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    /// Starting balance, defaults to "0"
    #[schema(example = "100.00")]
    #[serde(default)]
    pub balance: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AmountRequest {
    #[schema(example = "25.50")]
    pub amount: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTransferRequest {
    /// Source account id
    #[schema(example = 1)]
    pub from: AccountId,
    /// Target account id
    #[schema(example = 2)]
    pub to: AccountId,
    #[schema(example = "30.00")]
    pub amount: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountData {
    #[schema(example = 1)]
    pub id: AccountId,
    #[schema(value_type = String, example = "70.00")]
    pub balance: Amount,
}

impl From<Account> for AccountData {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            balance: account.balance,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransferData {
    #[schema(example = 1)]
    pub id: TransferId,
    #[schema(example = 1)]
    pub from: AccountId,
    #[schema(example = 2)]
    pub to: AccountId,
    #[schema(value_type = String, example = "30.00")]
    pub amount: Amount,
    /// Commit time, milliseconds since the Unix epoch
    #[schema(example = 1703494800000_i64)]
    pub created_at: i64,
}

impl From<Transfer> for TransferData {
    fn from(transfer: Transfer) -> Self {
        Self {
            id: transfer.id,
            from: transfer.from_account_id,
            to: transfer.to_account_id,
            amount: transfer.amount,
            created_at: transfer.created_at.timestamp_millis(),
        }
    }
}
