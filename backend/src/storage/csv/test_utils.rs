//! Test utilities module for automatic cleanup and consistent test infrastructure
//!
//! This module provides RAII-based cleanup that guarantees test data is removed
//! even if tests panic or fail.

use anyhow::Result;
use std::path::PathBuf;
use tempfile::TempDir;

use super::budget_repository::BudgetRepository;
use super::connection::CsvConnection;
use super::ledger_repository::LedgerRepository;

/// RAII Test Environment that automatically cleans up on drop
pub struct TestEnvironment {
    /// The temporary directory - kept alive to prevent auto-cleanup until drop
    _temp_dir: TempDir,
    pub connection: CsvConnection,
    /// Base directory path for manual inspection if needed
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = CsvConnection::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }

    pub fn ledger_repository(&self) -> LedgerRepository {
        LedgerRepository::new(self.connection.clone())
    }

    pub fn budget_repository(&self) -> BudgetRepository {
        BudgetRepository::new(self.connection.clone())
    }
}
