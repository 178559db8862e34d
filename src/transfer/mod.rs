//! Money transfers between accounts
//!
//! # Safety Invariants
//!
//! 1. **Conservation**: a committed transfer debits and credits the same amount
//! 2. **All-or-nothing**: debit, credit and record share one unit of work
//! 3. **Ordered locking**: account locks are taken in ascending id order
//! 4. **Append-only log**: transfer records are never updated or deleted

pub mod engine;
pub mod models;
pub mod state;

// Re-exports for convenience
pub use engine::TransferEngine;
pub use models::Transfer;
pub use state::TransferState;
