//! Bank Backend - accounts and atomic money transfers
//!
//! # Modules
//!
//! - [`core_types`] - Id aliases
//! - [`money`] - Fixed-point `Amount`
//! - [`error`] - `BankError` taxonomy
//! - [`store`] - Storage contracts + in-memory and PostgreSQL backends
//! - [`account`] - Account service and per-account locks
//! - [`transfer`] - Transfer engine (debit + credit + record in one unit of work)
//! - [`gateway`] - HTTP API
//! - [`config`] / [`logging`] - Runtime configuration and tracing setup

// Core types - must be first!
pub mod core_types;
pub mod error;
pub mod money;

pub mod account;
pub mod store;
pub mod transfer;

pub mod config;
pub mod gateway;
pub mod logging;

// Convenient re-exports at crate root
pub use account::{Account, AccountGuard, AccountLocks, AccountService};
pub use core_types::{AccountId, TransferId};
pub use error::BankError;
pub use money::Amount;
pub use store::{AccountStore, MemoryStore, PgStore, Store, TransferStore, UnitOfWork};
pub use transfer::{Transfer, TransferEngine, TransferState};
