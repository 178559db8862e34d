//! Money Conversion Module
//!
//! All balances and transfer amounts are held as integer minor units
//! (cents). Client values arrive as `Decimal` and enter through
//! [`Amount::try_from_decimal`], so no floating-point value ever touches a
//! balance. Outbound, `Amount` serializes as a fixed two-decimal string.
//!
//! ## Internal Representation
//! - `Amount` wraps a `u64` count of minor units
//! - The scale factor is `10^AMOUNT_DECIMALS` (100)
//! - The upper bound is `i64::MAX` minor units, the range of the store column
//!
//! ```ignore
//! let amount = Amount::try_from_decimal(dec!(1.5))?;
//! assert_eq!(amount.minor(), 150);
//! assert_eq!(amount.to_string(), "1.50");
//! ```

use std::fmt;

use rust_decimal::prelude::*;
use serde::{Serialize, Serializer};

use crate::error::BankError;

/// Decimal places carried by every amount
pub const AMOUNT_DECIMALS: u32 = 2;

const SCALE: u64 = 10u64.pow(AMOUNT_DECIMALS);

/// Largest representable amount, bounded by the BIGINT balance column
const MAX_MINOR: u64 = i64::MAX as u64;

/// Non-negative monetary amount in minor units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Build from raw minor units (e.g. `Amount::from_minor(7000)` is `70.00`)
    pub const fn from_minor(minor: u64) -> Self {
        Amount(minor)
    }

    #[inline]
    pub fn minor(&self) -> u64 {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Convert a client `Decimal` into minor units.
    ///
    /// Rejects negatives, more than [`AMOUNT_DECIMALS`] fractional digits
    /// (no silent truncation) and values beyond the storage range.
    pub fn try_from_decimal(value: Decimal) -> Result<Self, BankError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(BankError::InvalidAmount);
        }
        let normalized = value.normalize();
        if normalized.scale() > AMOUNT_DECIMALS {
            return Err(BankError::InvalidAmount);
        }
        let minor = normalized
            .checked_mul(Decimal::from(SCALE))
            .and_then(|v| v.to_u64())
            .ok_or(BankError::InvalidAmount)?;
        if minor > MAX_MINOR {
            return Err(BankError::InvalidAmount);
        }
        Ok(Amount(minor))
    }

    /// Sum within the storage range
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0
            .checked_add(other.0)
            .filter(|v| *v <= MAX_MINOR)
            .map(Amount)
    }

    /// Difference; `None` when `other` exceeds `self`
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// Value for the store's BIGINT column
    pub fn to_i64(&self) -> i64 {
        // MAX_MINOR keeps every constructed Amount within i64 range
        self.0 as i64
    }

    /// Read back a stored BIGINT; a negative value means the row is corrupt
    pub fn from_i64(raw: i64) -> Result<Self, BankError> {
        u64::try_from(raw)
            .map(Amount)
            .map_err(|_| BankError::StoreFailure(format!("negative stored amount: {}", raw)))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:0>width$}",
            self.0 / SCALE,
            self.0 % SCALE,
            width = AMOUNT_DECIMALS as usize
        )
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
