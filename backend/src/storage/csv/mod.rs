//! File-backed storage: monthly CSV ledgers plus a YAML budget record.
//!
//! File IO runs on the blocking pool through [`run_blocking`], so a stalled disk ties up a
//! pool thread instead of a runtime worker and the retry timeout can abandon the attempt.

pub mod budget_repository;
pub mod connection;
pub mod ledger_repository;

#[cfg(test)]
pub mod test_utils;

use anyhow::{Context, Result};

pub use budget_repository::BudgetRepository;
pub use connection::CsvConnection;
pub use ledger_repository::LedgerRepository;

/// Run blocking file work off the async workers
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .context("storage task did not complete")?
}
