//! # Storage Module
//!
//! Handles all data persistence for the budget tracker.
//!
//! The domain layer only sees the traits in [`traits`]; the file-backed implementation
//! lives in [`csv`]. Every call from the domain goes through a [`retry::RetryPolicy`],
//! and every mutation is serialized by a single [`LedgerWriteLock`].

pub mod csv;
pub mod retry;
pub mod traits;

use std::sync::Arc;

pub use retry::RetryPolicy;
pub use traits::{BudgetStorage, Connection, LedgerStorage};

/// Serializes every mutating operation (record, set, clear, resync)
pub type LedgerWriteLock = Arc<tokio::sync::Mutex<()>>;

pub fn new_write_lock() -> LedgerWriteLock {
    Arc::new(tokio::sync::Mutex::new(()))
}
