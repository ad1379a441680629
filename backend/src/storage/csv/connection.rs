use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::budget_repository::BudgetRepository;
use super::ledger_repository::LedgerRepository;
use crate::domain::models::period::LedgerPeriod;
use crate::storage::traits::Connection;

pub const LEDGER_HEADER: [&str; 7] = [
    "id",
    "date",
    "item",
    "amount",
    "category",
    "type",
    "recorded_at",
];

/// CsvConnection owns the data directory layout and makes sure ledger files exist
#[derive(Debug, Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new CSV connection rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();
        let ledger_dir = base_path.join("ledgers");

        if !ledger_dir.exists() {
            fs::create_dir_all(&ledger_dir).with_context(|| {
                format!("Failed to create ledger directory {}", ledger_dir.display())
            })?;
            info!("Created ledger directory: {}", ledger_dir.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn ledger_directory(&self) -> PathBuf {
        self.base_directory.join("ledgers")
    }

    pub fn ledger_file_path(&self, period: LedgerPeriod) -> PathBuf {
        self.ledger_directory().join(format!("{}.csv", period))
    }

    pub fn budget_file_path(&self) -> PathBuf {
        self.base_directory.join("budget.yaml")
    }

    /// Create the bucket file with its header row if it does not exist yet
    pub fn ensure_ledger_file_exists(&self, period: LedgerPeriod) -> Result<()> {
        let file_path = self.ledger_file_path(period);
        if file_path.exists() {
            return Ok(());
        }

        fs::create_dir_all(self.ledger_directory())?;
        let mut writer = csv::Writer::from_path(&file_path)
            .with_context(|| format!("Failed to create ledger file {}", file_path.display()))?;
        writer.write_record(LEDGER_HEADER)?;
        writer.flush()?;

        debug!("Created ledger file for {}: {}", period, file_path.display());
        Ok(())
    }
}

impl Connection for CsvConnection {
    type LedgerRepository = LedgerRepository;
    type BudgetRepository = BudgetRepository;

    fn create_ledger_repository(&self) -> Self::LedgerRepository {
        LedgerRepository::new(self.clone())
    }

    fn create_budget_repository(&self) -> Self::BudgetRepository {
        BudgetRepository::new(self.clone())
    }
}
