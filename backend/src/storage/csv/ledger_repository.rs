//! # CSV Ledger Repository
//!
//! Stores transactions in one CSV sheet per calendar month.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! ├── budget.yaml
//! └── ledgers/
//!     ├── 2026-09.csv
//!     └── 2026-10.csv    ← id,date,item,amount,category,type,recorded_at
//! ```
//!
//! Dates are written as ISO `YYYY-MM-DD` and `recorded_at` as RFC 3339. Sheets are
//! rewritten through a temp file and renamed into place, so readers never see a
//! half-written sheet. Rows that fail to parse are logged and skipped.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use csv::{Reader, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufWriter;
use tracing::{debug, info, warn};

use super::connection::{CsvConnection, LEDGER_HEADER};
use super::run_blocking;
use crate::domain::models::period::LedgerPeriod;
use crate::domain::models::transaction::{Transaction, TransactionType};
use crate::storage::traits::LedgerStorage;

/// CSV record structure for ledger rows
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LedgerRecord {
    id: String,
    date: String,
    item: String,
    amount: f64,
    category: String,
    #[serde(rename = "type")]
    transaction_type: String,
    recorded_at: String,
}

impl From<&Transaction> for LedgerRecord {
    fn from(transaction: &Transaction) -> Self {
        LedgerRecord {
            id: transaction.id.clone(),
            date: transaction.date.format("%Y-%m-%d").to_string(),
            item: transaction.item.clone(),
            amount: transaction.amount,
            category: transaction.category.clone(),
            transaction_type: transaction.transaction_type.to_string(),
            recorded_at: transaction.recorded_at.to_rfc3339(),
        }
    }
}

impl TryFrom<LedgerRecord> for Transaction {
    type Error = anyhow::Error;

    fn try_from(record: LedgerRecord) -> Result<Self> {
        let date = NaiveDate::parse_from_str(record.date.trim(), "%Y-%m-%d")
            .with_context(|| format!("invalid date '{}'", record.date))?;
        let transaction_type: TransactionType = record.transaction_type.parse()?;
        let recorded_at = DateTime::parse_from_rfc3339(record.recorded_at.trim())
            .with_context(|| format!("invalid recorded_at '{}'", record.recorded_at))?;
        if !record.amount.is_finite() {
            return Err(anyhow!("invalid amount '{}'", record.amount));
        }

        Ok(Transaction {
            id: record.id,
            date,
            item: record.item,
            amount: record.amount,
            category: record.category,
            transaction_type,
            recorded_at,
        })
    }
}

/// CSV-based ledger repository, one sheet per month
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    connection: CsvConnection,
}

impl LedgerRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Read every row of a bucket, oldest first. Missing sheet means no rows.
    fn read_period(&self, period: LedgerPeriod) -> Result<Vec<Transaction>> {
        let file_path = self.connection.ledger_file_path(period);
        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = Reader::from_path(&file_path)
            .with_context(|| format!("Failed to open ledger {}", file_path.display()))?;

        let mut transactions = Vec::new();
        for (index, result) in reader.deserialize::<LedgerRecord>().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping unreadable row {} in ledger {}: {}", index + 1, period, e);
                    continue;
                }
            };
            match Transaction::try_from(record) {
                Ok(transaction) => transactions.push(transaction),
                Err(e) => {
                    warn!("Skipping malformed row {} in ledger {}: {:#}", index + 1, period, e);
                }
            }
        }

        sort_chronologically(&mut transactions);
        debug!("Read {} transactions from ledger {}", transactions.len(), period);
        Ok(transactions)
    }

    /// Rewrite a bucket through a temp file and rename it into place
    fn write_period(&self, period: LedgerPeriod, transactions: &[Transaction]) -> Result<()> {
        self.connection.ensure_ledger_file_exists(period)?;
        let file_path = self.connection.ledger_file_path(period);
        let temp_file_path = file_path.with_extension("csv.tmp");

        {
            let temp_file = File::create(&temp_file_path)?;
            let mut csv_writer = WriterBuilder::new()
                .has_headers(false)
                .from_writer(BufWriter::new(temp_file));

            csv_writer.write_record(LEDGER_HEADER)?;
            for transaction in transactions {
                csv_writer.serialize(LedgerRecord::from(transaction))?;
            }
            csv_writer.flush()?;
        }

        fs::rename(&temp_file_path, &file_path)
            .with_context(|| format!("Failed to replace ledger {}", file_path.display()))?;

        debug!("Wrote {} transactions to {}", transactions.len(), file_path.display());
        Ok(())
    }
}

fn sort_chronologically(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.recorded_at.cmp(&b.recorded_at))
            .then_with(|| a.id.cmp(&b.id))
    });
}

impl LedgerRepository {
    fn append_blocking(&self, transaction: &Transaction) -> Result<bool> {
        let period = transaction.period();
        let mut transactions = self.read_period(period)?;

        if transactions.iter().any(|t| t.id == transaction.id) {
            debug!("Transaction {} already in ledger {}, skipping append", transaction.id, period);
            return Ok(false);
        }

        transactions.push(transaction.clone());
        sort_chronologically(&mut transactions);
        self.write_period(period, &transactions)?;

        info!("Appended transaction {} to ledger {}", transaction.id, period);
        Ok(true)
    }

    fn remove_blocking(&self, period: LedgerPeriod, transaction_id: &str) -> Result<bool> {
        let mut transactions = self.read_period(period)?;
        let before = transactions.len();
        transactions.retain(|t| t.id != transaction_id);

        if transactions.len() == before {
            return Ok(false);
        }

        self.write_period(period, &transactions)?;
        info!("Removed transaction {} from ledger {}", transaction_id, period);
        Ok(true)
    }

    fn range_blocking(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Transaction>> {
        let mut transactions = Vec::new();
        for period in LedgerPeriod::covering(start, end) {
            transactions.extend(
                self.read_period(period)?
                    .into_iter()
                    .filter(|t| t.date >= start && t.date <= end),
            );
        }
        sort_chronologically(&mut transactions);
        Ok(transactions)
    }

    fn periods_blocking(&self) -> Result<Vec<LedgerPeriod>> {
        let ledger_dir = self.connection.ledger_directory();
        if !ledger_dir.exists() {
            return Ok(Vec::new());
        }

        let mut periods = Vec::new();
        for entry in fs::read_dir(&ledger_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match stem.parse::<LedgerPeriod>() {
                Ok(period) => periods.push(period),
                Err(_) => debug!("Ignoring non-ledger file {}", path.display()),
            }
        }

        periods.sort_by(|a, b| b.cmp(a));
        Ok(periods)
    }
}

#[async_trait]
impl LedgerStorage for LedgerRepository {
    async fn append_transaction(&self, transaction: &Transaction) -> Result<bool> {
        let repository = self.clone();
        let transaction = transaction.clone();
        run_blocking(move || repository.append_blocking(&transaction)).await
    }

    async fn remove_transaction(&self, period: LedgerPeriod, transaction_id: &str) -> Result<bool> {
        let repository = self.clone();
        let transaction_id = transaction_id.to_string();
        run_blocking(move || repository.remove_blocking(period, &transaction_id)).await
    }

    async fn list_period(&self, period: LedgerPeriod) -> Result<Vec<Transaction>> {
        let repository = self.clone();
        run_blocking(move || repository.read_period(period)).await
    }

    async fn list_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Transaction>> {
        let repository = self.clone();
        run_blocking(move || repository.range_blocking(start, end)).await
    }

    async fn list_periods(&self) -> Result<Vec<LedgerPeriod>> {
        let repository = self.clone();
        run_blocking(move || repository.periods_blocking()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;
    use chrono::{FixedOffset, TimeZone};

    fn tx(id: &str, y: i32, m: u32, d: u32, hour: u32, amount: f64) -> Transaction {
        Transaction {
            id: id.to_string(),
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            item: format!("item {}", id),
            amount,
            category: "Food".to_string(),
            transaction_type: TransactionType::Variable,
            recorded_at: FixedOffset::east_opt(7 * 3600)
                .unwrap()
                .with_ymd_and_hms(y, m, d, hour, 0, 0)
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn test_append_and_list_period_in_order() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = env.ledger_repository();

        repo.append_transaction(&tx("b", 2026, 10, 2, 9, 5.0)).await.unwrap();
        repo.append_transaction(&tx("a", 2026, 10, 1, 18, 12.5)).await.unwrap();
        repo.append_transaction(&tx("c", 2026, 10, 2, 8, 3.0)).await.unwrap();

        let period: LedgerPeriod = "2026-10".parse().unwrap();
        let rows = repo.list_period(period).await.unwrap();
        let ids: Vec<&str> = rows.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
        assert_eq!(rows[0].amount, 12.5);
        assert_eq!(rows[0].category, "Food");
    }

    #[tokio::test]
    async fn test_append_is_idempotent_by_id() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = env.ledger_repository();
        let transaction = tx("dup", 2026, 10, 3, 10, 9.0);

        assert!(repo.append_transaction(&transaction).await.unwrap());
        assert!(!repo.append_transaction(&transaction).await.unwrap());

        let rows = repo.list_period(transaction.period()).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_ledger_file_layout() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = env.ledger_repository();
        repo.append_transaction(&tx("x1", 2026, 10, 5, 12, 20.0)).await.unwrap();

        let content = fs::read_to_string(env.base_path.join("ledgers").join("2026-10.csv")).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("id,date,item,amount,category,type,recorded_at"));
        assert_eq!(
            lines.next(),
            Some("x1,2026-10-05,item x1,20.0,Food,Variable,2026-10-05T12:00:00+07:00")
        );
    }

    #[tokio::test]
    async fn test_list_range_spans_buckets() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = env.ledger_repository();
        repo.append_transaction(&tx("sep", 2026, 9, 29, 12, 1.0)).await.unwrap();
        repo.append_transaction(&tx("oct", 2026, 10, 2, 12, 2.0)).await.unwrap();
        repo.append_transaction(&tx("late", 2026, 10, 20, 12, 3.0)).await.unwrap();

        let rows = repo
            .list_range(
                NaiveDate::from_ymd_opt(2026, 9, 28).unwrap(),
                NaiveDate::from_ymd_opt(2026, 10, 10).unwrap(),
            )
            .await
            .unwrap();
        let ids: Vec<&str> = rows.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["sep", "oct"]);
    }

    #[tokio::test]
    async fn test_list_periods_newest_first() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = env.ledger_repository();
        assert!(repo.list_periods().await.unwrap().is_empty());

        repo.append_transaction(&tx("a", 2026, 8, 1, 12, 1.0)).await.unwrap();
        repo.append_transaction(&tx("b", 2026, 10, 1, 12, 1.0)).await.unwrap();
        repo.append_transaction(&tx("c", 2025, 12, 1, 12, 1.0)).await.unwrap();
        fs::write(env.base_path.join("ledgers").join("notes.csv"), "x").unwrap();

        let periods: Vec<String> = repo
            .list_periods()
            .await
            .unwrap()
            .iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(periods, vec!["2026-10", "2026-08", "2025-12"]);
    }

    #[tokio::test]
    async fn test_remove_transaction() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = env.ledger_repository();
        let keep = tx("keep", 2026, 10, 1, 12, 1.0);
        let removed = tx("removed", 2026, 10, 1, 13, 2.0);
        repo.append_transaction(&keep).await.unwrap();
        repo.append_transaction(&removed).await.unwrap();

        assert!(repo.remove_transaction(removed.period(), "removed").await.unwrap());
        assert!(!repo.remove_transaction(removed.period(), "removed").await.unwrap());

        let rows = repo.list_period(keep.period()).await.unwrap();
        assert_eq!(rows, vec![keep]);
    }

    #[tokio::test]
    async fn test_malformed_rows_are_skipped() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = env.ledger_repository();
        let path = env.base_path.join("ledgers").join("2026-10.csv");
        fs::write(
            &path,
            "id,date,item,amount,category,type,recorded_at\n\
             ok,2026-10-01,Lunch,12.5,Food,Variable,2026-10-01T12:00:00+07:00\n\
             bad-date,10/02/2026,Lunch,4,Food,Variable,2026-10-02T12:00:00+07:00\n\
             bad-amount,2026-10-02,Lunch,lots,Food,Variable,2026-10-02T12:00:00+07:00\n\
             bad-type,2026-10-02,Rent,400,Housing,Monthly,2026-10-02T12:00:00+07:00\n",
        )
        .unwrap();

        let rows = repo.list_period("2026-10".parse().unwrap()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "ok");
    }
}
