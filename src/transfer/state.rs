//! Transfer lifecycle states
//!
//! ```text
//! VALIDATED → LOCKED → DEBITED → CREDITED → RECORDED
//!                 ↓         ↓          ↓
//!              ABORTED (unit of work rolled back, balances untouched)
//! ```
//!
//! States only exist for the duration of one `transfer` call; they are
//! used for structured logging, never persisted.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferState {
    /// Endpoints and amount checked
    Validated,

    /// Both account locks held, unit of work open
    Locked,

    /// Source debit staged
    Debited,

    /// Target credit staged
    Credited,

    /// Terminal: transfer record written and unit of work committed
    Recorded,

    /// Terminal: failed after validation, everything rolled back
    Aborted,
}

impl TransferState {
    /// Whether the forward transition `self → next` is legal
    pub fn can_advance_to(&self, next: TransferState) -> bool {
        use TransferState::*;
        match (self, next) {
            (Validated, Locked)
            | (Locked, Debited)
            | (Debited, Credited)
            | (Credited, Recorded) => true,
            (Validated | Locked | Debited | Credited, Aborted) => true,
            _ => false,
        }
    }

    /// Get human-readable state name
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferState::Validated => "VALIDATED",
            TransferState::Locked => "LOCKED",
            TransferState::Debited => "DEBITED",
            TransferState::Credited => "CREDITED",
            TransferState::Recorded => "RECORDED",
            TransferState::Aborted => "ABORTED",
        }
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
