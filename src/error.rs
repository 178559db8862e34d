//! Domain error taxonomy
//!
//! Every failure the core can report. The HTTP layer translates these into
//! the `ApiResponse` envelope using [`BankError::code`] and
//! [`BankError::http_status`].

use thiserror::Error;

use crate::core_types::AccountId;

/// PostgreSQL SQLSTATE for `lock_not_available` (raised when `lock_timeout` expires)
const PG_LOCK_NOT_AVAILABLE: &str = "55P03";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BankError {
    #[error("Account not found: {0}")]
    NotFound(AccountId),

    #[error("Amount must be a positive value with at most 2 decimal places")]
    InvalidAmount,

    #[error("Source and target account cannot be the same")]
    InvalidTransfer,

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Account is busy, retry later")]
    Busy,

    #[error("Store failure: {0}")]
    StoreFailure(String),
}

impl BankError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            BankError::NotFound(_) => "NOT_FOUND",
            BankError::InvalidAmount => "INVALID_AMOUNT",
            BankError::InvalidTransfer => "INVALID_TRANSFER",
            BankError::InsufficientFunds => "INSUFFICIENT_FUNDS",
            BankError::Busy => "BUSY",
            BankError::StoreFailure(_) => "STORE_FAILURE",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            BankError::NotFound(_) => 404,
            BankError::InvalidAmount
            | BankError::InvalidTransfer
            | BankError::InsufficientFunds => 400,
            BankError::Busy => 503,
            BankError::StoreFailure(_) => 500,
        }
    }

    /// Whether the caller may retry the same request unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, BankError::Busy)
    }
}

impl From<sqlx::Error> for BankError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.code().as_deref() == Some(PG_LOCK_NOT_AVAILABLE)
        {
            return BankError::Busy;
        }
        if matches!(e, sqlx::Error::PoolTimedOut) {
            return BankError::Busy;
        }
        BankError::StoreFailure(e.to_string())
    }
}
