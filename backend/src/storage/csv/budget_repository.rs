//! # YAML Budget Repository
//!
//! Stores the single active budget period in `{data_directory}/budget.yaml`.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! ├── budget.yaml    ← This module manages this file
//! └── ledgers/
//! ```
//!
//! Saving replaces the whole record through a temp file and rename. Clearing deletes
//! the file; a missing file means no budget is active.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs;
use tracing::{debug, info};

use super::connection::CsvConnection;
use super::run_blocking;
use crate::domain::models::budget::BudgetPeriod;
use crate::storage::traits::BudgetStorage;

#[derive(Debug, Clone)]
pub struct BudgetRepository {
    connection: CsvConnection,
}

impl BudgetRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn load_blocking(&self) -> Result<Option<BudgetPeriod>> {
        let yaml_path = self.connection.budget_file_path();
        if !yaml_path.exists() {
            debug!("No budget record at {}", yaml_path.display());
            return Ok(None);
        }

        let yaml_content = fs::read_to_string(&yaml_path)
            .with_context(|| format!("Failed to read {}", yaml_path.display()))?;
        let budget: BudgetPeriod = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Failed to parse {}", yaml_path.display()))?;

        debug!("Loaded budget '{}' from {}", budget.name, yaml_path.display());
        Ok(Some(budget))
    }

    fn save_blocking(&self, budget: &BudgetPeriod) -> Result<()> {
        let yaml_path = self.connection.budget_file_path();
        let yaml_content = serde_yaml::to_string(budget)?;

        let temp_path = yaml_path.with_extension("yaml.tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, &yaml_path)
            .with_context(|| format!("Failed to replace {}", yaml_path.display()))?;

        info!(
            "Saved budget '{}' ({} to {}, fixed {:.2}, variable {:.2})",
            budget.name,
            budget.start_date,
            budget.end_date,
            budget.fixed_spent,
            budget.variable_spent
        );
        Ok(())
    }

    fn delete_blocking(&self) -> Result<bool> {
        let yaml_path = self.connection.budget_file_path();
        if !yaml_path.exists() {
            return Ok(false);
        }

        fs::remove_file(&yaml_path)
            .with_context(|| format!("Failed to remove {}", yaml_path.display()))?;
        info!("Removed budget record {}", yaml_path.display());
        Ok(true)
    }
}

#[async_trait]
impl BudgetStorage for BudgetRepository {
    async fn load_budget(&self) -> Result<Option<BudgetPeriod>> {
        let repository = self.clone();
        run_blocking(move || repository.load_blocking()).await
    }

    async fn save_budget(&self, budget: &BudgetPeriod) -> Result<()> {
        let repository = self.clone();
        let budget = budget.clone();
        run_blocking(move || repository.save_blocking(&budget)).await
    }

    async fn delete_budget(&self) -> Result<bool> {
        let repository = self.clone();
        run_blocking(move || repository.delete_blocking()).await
    }
}
