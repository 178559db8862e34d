//! Core types used throughout the system
//!
//! Identifiers are assigned by the store (`BIGSERIAL` in PostgreSQL, an
//! atomic counter in memory) and are never reused or mutated.

/// Account ID - store-assigned, immutable after creation.
///
/// Also defines the global lock order: transfers always lock the lower
/// account id first.
pub type AccountId = i64;

/// Transfer ID - store-assigned, unique across all transfers.
pub type TransferId = i64;
