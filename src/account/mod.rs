//! Account management module

pub mod locks;
pub mod models;
pub mod service;

// Re-export commonly used types
pub use locks::{AccountGuard, AccountLocks};
pub use models::Account;
pub use service::AccountService;
