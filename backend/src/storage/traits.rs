//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::models::budget::BudgetPeriod;
use crate::domain::models::period::LedgerPeriod;
use crate::domain::models::transaction::Transaction;

/// Trait defining the interface for ledger storage operations
///
/// The ledger is bucketed by calendar month. Every list operation returns rows in
/// chronological order (date, then write time).
#[async_trait]
pub trait LedgerStorage: Send + Sync {
    /// Append a transaction to the bucket of its date.
    /// Returns false when a row with the same id already exists, so a retried append is a no-op.
    async fn append_transaction(&self, transaction: &Transaction) -> Result<bool>;

    /// Remove a single transaction. Returns true if it was found and removed.
    async fn remove_transaction(&self, period: LedgerPeriod, transaction_id: &str) -> Result<bool>;

    /// All transactions of one bucket. A bucket that was never written is empty.
    async fn list_period(&self, period: LedgerPeriod) -> Result<Vec<Transaction>>;

    /// All transactions dated within the inclusive range, across buckets
    async fn list_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Transaction>>;

    /// Buckets that exist in storage, newest first
    async fn list_periods(&self) -> Result<Vec<LedgerPeriod>>;
}

/// Trait defining the interface for the single active budget record
#[async_trait]
pub trait BudgetStorage: Send + Sync {
    async fn load_budget(&self) -> Result<Option<BudgetPeriod>>;

    /// Replace the stored budget in full
    async fn save_budget(&self, budget: &BudgetPeriod) -> Result<()>;

    /// Returns true if a budget existed and was removed
    async fn delete_budget(&self) -> Result<bool>;
}

/// Trait defining the interface for storage connections
///
/// This trait abstracts away the specific connection type and provides factory
/// methods for creating repositories, so the domain layer works with any storage
/// backend without knowing the implementation details.
pub trait Connection: Send + Sync + Clone {
    type LedgerRepository: LedgerStorage + Clone;
    type BudgetRepository: BudgetStorage + Clone;

    fn create_ledger_repository(&self) -> Self::LedgerRepository;

    fn create_budget_repository(&self) -> Self::BudgetRepository;
}
